// ==========================================
// 交通管制作业看板 - 作业筛选与分页
// ==========================================
// 筛选条件之间为"与"关系；结果按开工日期倒序
// 标志牌状态筛选只保留状态匹配的待开工作业
// ==========================================

use crate::domain::job::Job;
use crate::domain::types::{JobStatus, SignStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    /// 关键字（匹配显示名称/地点/承包商，大小写不敏感）
    #[serde(default)]
    pub search: Option<String>,
    /// 允许的作业状态（空集合不匹配任何作业）
    #[serde(default = "all_statuses")]
    pub statuses: Vec<JobStatus>,
    #[serde(default)]
    pub project_manager: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub sign_status: Option<SignStatus>,
}

fn all_statuses() -> Vec<JobStatus> {
    JobStatus::ALL.to_vec()
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            search: None,
            statuses: all_statuses(),
            project_manager: None,
            branch: None,
            sign_status: None,
        }
    }
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => {
                let needle = s.to_lowercase();
                [
                    Some(job.display_name()),
                    job.location.as_deref(),
                    job.contractor.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        };

        let matches_status = self.statuses.contains(&job.status);

        let matches_pm = self
            .project_manager
            .as_deref()
            .map_or(true, |pm| job.project_manager.eq_ignore_ascii_case(pm.trim()));

        let matches_branch = self
            .branch
            .as_deref()
            .map_or(true, |b| job.branch.eq_ignore_ascii_case(b.trim()));

        let matches_sign = self.sign_status.map_or(true, |wanted| {
            job.status == JobStatus::PendingStart && job.sign_status == Some(wanted)
        });

        matches_search && matches_status && matches_pm && matches_branch && matches_sign
    }

    /// 筛选并排序（开工日期倒序，同日按 id 升序）
    pub fn apply(&self, jobs: &[Job]) -> Vec<Job> {
        let mut filtered: Vec<Job> = jobs.iter().filter(|j| self.matches(j)).cloned().collect();
        filtered.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.id.cmp(&b.id)));
        filtered
    }
}

// ==========================================
// JobPage - 分页结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPage {
    pub items: Vec<Job>,
    pub page: usize,      // 从 1 开始
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// 分页（page 从 1 开始，0 按 1 处理；越界页返回空 items）
pub fn paginate(jobs: Vec<Job>, page: usize, page_size: usize) -> JobPage {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = jobs.len();
    let total_pages = total.div_ceil(page_size);

    let items = jobs
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    JobPage {
        items,
        page,
        page_size,
        total,
        total_pages,
    }
}

/// 去重后的项目经理列表（字典序）
pub fn distinct_project_managers(jobs: &[Job]) -> Vec<String> {
    jobs.iter()
        .map(|j| j.project_manager.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 去重后的分公司列表（字典序）
pub fn distinct_branches(jobs: &[Job]) -> Vec<String> {
    jobs.iter()
        .map(|j| j.branch.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::NewJob;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn job(id: i64, start: NaiveDate, status: JobStatus, pm: &str, branch: &str) -> Job {
        let mut new_job = NewJob::new(&format!("J-{}", id), start, status);
        new_job.project_manager = Some(pm.to_string());
        new_job.branch = Some(branch.to_string());
        new_job.into_job(id, date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap())
    }

    fn sample() -> Vec<Job> {
        let mut a = job(1, date(2024, 1, 10), JobStatus::OnGoing, "NELSON", "hatfield");
        a.location = Some("Route 309 Bridge".to_string());
        a.contractor = Some("Allan Myers".to_string());

        let mut b = job(2, date(2024, 3, 1), JobStatus::PendingStart, "GARCIA", "turbotville");
        b.sign_status = Some(SignStatus::NotReceived);

        let mut c = job(3, date(2024, 2, 1), JobStatus::PendingStart, "NELSON", "bedford");
        c.sign_status = Some(SignStatus::Received);

        let d = job(4, date(2024, 2, 1), JobStatus::Complete, "GARCIA", "hatfield");
        vec![a, b, c, d]
    }

    #[test]
    fn test_default_filter_sorts_by_start_desc() {
        let ids: Vec<i64> = JobFilter::default().apply(&sample()).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_search_covers_location_and_contractor() {
        let filter = JobFilter {
            search: Some("myers".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sample()).len(), 1);

        let filter = JobFilter {
            search: Some("j-4".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sample())[0].id, 4);
    }

    #[test]
    fn test_sign_status_only_keeps_pending_jobs() {
        let filter = JobFilter {
            sign_status: Some(SignStatus::Received),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&sample()).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_status_pm_and_branch_filters() {
        let filter = JobFilter {
            statuses: vec![JobStatus::PendingStart, JobStatus::Complete],
            project_manager: Some("garcia".to_string()),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&sample()).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2, 4]);

        let filter = JobFilter {
            branch: Some("Hatfield".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sample()).len(), 2);

        let filter = JobFilter {
            statuses: vec![],
            ..Default::default()
        };
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn test_paginate() {
        let page = paginate(sample(), 2, 3);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);

        let beyond = paginate(sample(), 5, 3);
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn test_paginate_extreme_page_numbers() {
        let empty = paginate(vec![], usize::MAX, 2);
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);

        let far = paginate(sample(), usize::MAX, 2);
        assert!(far.items.is_empty());
        assert_eq!(far.page, usize::MAX);
        assert_eq!(far.total_pages, 2);

        // page_size 极大: 全部落在第一页
        let whole = paginate(sample(), 1, usize::MAX);
        assert_eq!(whole.items.len(), 4);
        assert_eq!(whole.total_pages, 1);

        let past = paginate(sample(), usize::MAX, usize::MAX);
        assert!(past.items.is_empty());
    }

    #[test]
    fn test_distinct_option_lists() {
        assert_eq!(distinct_project_managers(&sample()), vec!["GARCIA", "NELSON"]);
        assert_eq!(
            distinct_branches(&sample()),
            vec!["bedford", "hatfield", "turbotville"]
        );
    }
}
