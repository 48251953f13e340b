//! 去重服务 - 业务能力层
//!
//! 把一个或多个有序批次合并为身份唯一的有序批次

use crate::models::{IdentityKey, Record};
use std::collections::HashSet;

/// 去重器
///
/// 先出现的记录胜出：靠前的批次优先，同一批次内靠前的位置优先。
/// 保留下来的记录保持原有相对顺序。
#[derive(Debug, Default, Clone, Copy)]
pub struct Deduplicator;

impl Deduplicator {
    pub fn new() -> Self {
        Self
    }

    /// 合并多个批次
    pub fn merge(&self, batches: &[Vec<Record>]) -> Vec<Record> {
        let mut seen: HashSet<IdentityKey> = HashSet::new();
        batches
            .iter()
            .flatten()
            .filter(|record| seen.insert(record.identity()))
            .cloned()
            .collect()
    }

    /// 只做批内去重
    pub fn dedup(&self, batch: &[Record]) -> Vec<Record> {
        let mut seen: HashSet<IdentityKey> = HashSet::new();
        batch
            .iter()
            .filter(|record| seen.insert(record.identity()))
            .cloned()
            .collect()
    }

    /// 剔除身份已在 `history` 中的记录
    pub fn exclude(&self, batch: Vec<Record>, history: &HashSet<IdentityKey>) -> Vec<Record> {
        batch
            .into_iter()
            .filter(|record| !history.contains(&record.identity()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(title: &str, url: &str) -> Record {
        Record::new(title, url, "", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn titles(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(Deduplicator::new().merge(&[]).is_empty());
        assert!(Deduplicator::new().merge(&[vec![], vec![]]).is_empty());
    }

    #[test]
    fn batch_of_duplicates_yields_singleton() {
        let batch = vec![rec("A", "u1"), rec("A2", "u1"), rec("A3", "u1")];
        let merged = Deduplicator::new().merge(&[batch]);
        assert_eq!(titles(&merged), vec!["A"]);
    }

    #[test]
    fn disjoint_batches_concatenate_in_order() {
        let a = vec![rec("A", "u1"), rec("B", "u2")];
        let b = vec![rec("C", "u3"), rec("D", "u4")];
        let merged = Deduplicator::new().merge(&[a, b]);
        assert_eq!(titles(&merged), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn earliest_batch_wins() {
        let a = vec![rec("from-a", "u1"), rec("B", "u2")];
        let b = vec![rec("C", "u3"), rec("from-b", "u1")];
        let dedup = Deduplicator::new();

        let ab = dedup.merge(&[a.clone(), b.clone()]);
        assert_eq!(titles(&ab), vec!["from-a", "B", "C"]);

        let ba = dedup.merge(&[b, a]);
        assert_eq!(titles(&ba), vec!["C", "from-b", "B"]);

        // 两种顺序去掉的是同一组重复
        let mut ab_keys: Vec<_> = ab.iter().map(|r| r.identity()).collect();
        let mut ba_keys: Vec<_> = ba.iter().map(|r| r.identity()).collect();
        ab_keys.sort_by_key(|k| k.to_string());
        ba_keys.sort_by_key(|k| k.to_string());
        assert_eq!(ab_keys, ba_keys);
    }

    #[test]
    fn same_title_different_url_are_distinct() {
        let batch = vec![rec("tools", "u1"), rec("tools", "u2")];
        assert_eq!(Deduplicator::new().dedup(&batch).len(), 2);
    }

    #[test]
    fn history_excludes_regardless_of_other_fields() {
        let mut changed = rec("A", "u1");
        changed.description = "a new description".into();
        let history: HashSet<IdentityKey> = [IdentityKey::Url("u1".into())].into_iter().collect();
        let kept = Deduplicator::new().exclude(vec![changed, rec("B", "u2")], &history);
        assert_eq!(titles(&kept), vec!["B"]);
    }
}
