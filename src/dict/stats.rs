//! Statistics reporting: per-table size/fill/chain-length histogram.

use std::fmt::Write as _;

use crate::dict::table::BucketTable;

/// Chain lengths at or above this bucket collapse into the last histogram
/// slot. Matches the original source's `DICT_STATS_VEC_SIZE`.
const STATS_VEC_SIZE: usize = 50;

/// Statistics for a single bucket table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    pub size: usize,
    pub filled: usize,
    pub distinct_slots: usize,
    pub max_chain_len: usize,
    /// Mean chain length over occupied slots, counted by walking every chain.
    pub avg_chain_len_counted: f64,
    /// Mean chain length derived from `filled / distinct_slots`.
    pub avg_chain_len_computed: f64,
    /// `chain_len_histogram[i]` = number of slots whose chain has length `i`,
    /// for `i < STATS_VEC_SIZE - 1`; `chain_len_histogram[STATS_VEC_SIZE - 1]`
    /// collapses every chain length `>= STATS_VEC_SIZE - 1`, including empty
    /// slots at index 0.
    pub chain_len_histogram: Vec<u64>,
}

impl TableStats {
    pub(crate) fn collect<K, V>(table: &BucketTable<K, V>) -> Option<Self> {
        if table.filled == 0 {
            return None;
        }

        let mut histogram = vec![0u64; STATS_VEC_SIZE];
        let mut distinct_slots = 0usize;
        let mut max_chain_len = 0usize;
        let mut total_chain_len = 0u64;

        for head in &table.buckets {
            let mut chain_len = 0usize;
            let mut cur = head;
            while let Some(node) = cur {
                chain_len += 1;
                cur = &node.next;
            }

            if chain_len == 0 {
                histogram[0] += 1;
                continue;
            }

            distinct_slots += 1;
            let bucket = chain_len.min(STATS_VEC_SIZE - 1);
            histogram[bucket] += 1;
            max_chain_len = max_chain_len.max(chain_len);
            total_chain_len += chain_len as u64;
        }

        Some(TableStats {
            size: table.size(),
            filled: table.filled,
            distinct_slots,
            max_chain_len,
            avg_chain_len_counted: total_chain_len as f64 / distinct_slots as f64,
            avg_chain_len_computed: table.filled as f64 / distinct_slots as f64,
            chain_len_histogram: histogram,
        })
    }

    fn write_report(
        &self,
        out: &mut String,
        table_label: u8,
    ) {
        let _ = writeln!(out, "Hash table {table_label}:");
        let _ = writeln!(out, " size: {}", self.size);
        let _ = writeln!(out, " filled: {}", self.filled);
        let _ = writeln!(out, " different slots: {}", self.distinct_slots);
        let _ = writeln!(out, " max chain length: {}", self.max_chain_len);
        let _ = writeln!(
            out,
            " avg chain length (counted): {:.2}",
            self.avg_chain_len_counted
        );
        let _ = writeln!(
            out,
            " avg chain length (computed): {:.2}",
            self.avg_chain_len_computed
        );
        let _ = writeln!(out, " Chain length distribution:");

        for (len, count) in self.chain_len_histogram.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let pct = (*count as f64 / self.size as f64) * 100.0;
            let prefix = if len == STATS_VEC_SIZE - 1 { ">= " } else { "" };
            let _ = writeln!(out, "   {prefix}{len}: {count} ({pct:.2}%)");
        }
    }
}

/// Statistics for both tables of a dictionary. `t1` is `None` unless a rehash
/// is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DictStats {
    pub t0: Option<TableStats>,
    pub t1: Option<TableStats>,
}

impl DictStats {
    /// Renders the human-readable report the original source produces via
    /// `dictStats`. Unlike the C source this is an owned `String`: there is
    /// no caller-provided fixed buffer to truncate into or null-terminate.
    pub fn report(&self) -> String {
        let mut out = String::new();
        match &self.t0 {
            Some(stats) => stats.write_report(&mut out, 0),
            None => out.push_str("Empty dict.\n"),
        }
        if let Some(stats) = &self.t1 {
            stats.write_report(&mut out, 1);
        }
        out
    }
}
