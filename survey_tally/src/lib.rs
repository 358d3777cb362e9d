mod config;
use log::{debug, info};

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

pub use crate::config::*;

pub mod builder;

// **** Merging ****

/// Merges a newly collected batch into the canonical table.
///
/// The resulting columns are the canonical columns, in order, followed by the
/// columns that only the batch has. Cells of a column that one side lacks are
/// blank. The canonical rows come first, then the batch rows, and every row
/// that repeats an earlier row value for value is dropped.
///
/// An empty batch is not an error: the result is the deduplicated canonical
/// table.
pub fn merge_tables(canonical: &Table, batch: &Table) -> MergeResult {
    info!(
        "merge_tables: {} canonical rows ({} columns), {} batch rows ({} columns)",
        canonical.len(),
        canonical.columns.len(),
        batch.len(),
        batch.columns.len()
    );

    let columns = union_columns(&canonical.columns, &batch.columns);
    debug!("merge_tables: merged columns: {:?}", columns);

    let mut combined: Vec<Vec<String>> = Vec::with_capacity(canonical.len() + batch.len());
    for source in [canonical, batch] {
        let mapping = column_mapping(&columns, &source.columns);
        for row in source.rows.iter() {
            combined.push(align_row(row, &mapping));
        }
    }

    let table = dedupe_rows(columns, combined);
    let stats = MergeStats {
        canonical_rows: canonical.len(),
        batch_rows: batch.len(),
        merged_rows: table.len(),
    };
    info!("merge_tables: {:?}", stats);
    MergeResult { table, stats }
}

/// Removes every row that is identical to an earlier row. The first occurrence
/// is kept.
pub fn dedupe(table: &Table) -> Table {
    dedupe_rows(table.columns.clone(), table.rows.clone())
}

fn dedupe_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Table {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut kept: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        if seen.contains(&row) {
            debug!("dedupe: dropping duplicate row {}: {:?}", idx + 1, row);
            continue;
        }
        seen.insert(row.clone());
        kept.push(row);
    }
    Table {
        columns,
        rows: kept,
    }
}

fn union_columns(first: &[String], second: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = first.to_vec();
    for c in second {
        if !columns.contains(c) {
            columns.push(c.clone());
        }
    }
    columns
}

// For each output column, where to find it in the source row (if at all).
fn column_mapping(columns: &[String], source_columns: &[String]) -> Vec<Option<usize>> {
    columns
        .iter()
        .map(|c| source_columns.iter().position(|sc| sc == c))
        .collect()
}

fn align_row(row: &[String], mapping: &[Option<usize>]) -> Vec<String> {
    mapping
        .iter()
        .map(|o| o.and_then(|idx| row.get(idx).cloned()).unwrap_or_default())
        .collect()
}

// **** Aggregations ****

/// Counts the rows per distinct value of a categorical field.
///
/// Arguments:
/// * `field` the exact column name
/// * `order` the order of the returned counts
/// * `blanks` whether unanswered rows form their own [Category::Blank] group
///
/// With [BlankPolicy::Keep], the counts add up to the number of rows.
pub fn count_values(
    table: &Table,
    field: &str,
    order: SortOrder,
    blanks: BlankPolicy,
) -> Result<Vec<FieldCount>, TallyErrors> {
    let idx = table.column_index(field)?;
    let labels = table
        .rows
        .iter()
        .map(|row| Category::from_value(&row[idx]))
        .filter(|c| blanks == BlankPolicy::Keep || *c != Category::Blank);
    let counts = sorted_counts(labels, order);
    debug!("count_values: field {:?}: {:?}", field, counts);
    Ok(counts
        .into_iter()
        .map(|(label, count)| FieldCount { label, count })
        .collect())
}

/// Tabulates a multi-select field: every answer is split on the delimiter and
/// each option gets one vote.
///
/// Blank answers contribute no vote at all. Since a row can select several
/// options, the total number of votes is usually larger than the number of
/// rows. An empty delimiter keeps every answer as a single option.
pub fn tabulate_options(
    table: &Table,
    field: &str,
    delimiter: &str,
    order: SortOrder,
    normalization: OptionNormalization,
) -> Result<Vec<FieldCount>, TallyErrors> {
    let idx = table.column_index(field)?;
    let mut options: Vec<String> = Vec::new();
    let mut answered: usize = 0;
    for row in table.rows.iter() {
        let value = &row[idx];
        if value.is_empty() {
            continue;
        }
        answered += 1;
        let fragments: Vec<&str> = if delimiter.is_empty() {
            vec![value.as_str()]
        } else {
            value.split(delimiter).collect()
        };
        match normalization {
            OptionNormalization::Exact => {
                options.extend(fragments.iter().map(|s| s.to_string()));
            }
            OptionNormalization::TrimCaseFold => {
                options.extend(
                    fragments
                        .iter()
                        .map(|s| s.trim().to_lowercase())
                        .filter(|s| !s.is_empty()),
                );
            }
        }
    }
    info!(
        "tabulate_options: field {:?}: {} votes from {} answered rows",
        field,
        options.len(),
        answered
    );
    let counts = sorted_counts(options.into_iter(), order);
    Ok(counts
        .into_iter()
        .map(|(option, count)| FieldCount {
            label: Category::Value(option),
            count,
        })
        .collect())
}

/// Counts the rows whose raw value equals (or differs from) the target.
/// Blank values are compared as the empty string.
pub fn count_matching(
    table: &Table,
    field: &str,
    target: &str,
    comparison: Comparison,
) -> Result<u64, TallyErrors> {
    let idx = table.column_index(field)?;
    let count = table
        .rows
        .iter()
        .filter(|row| match comparison {
            Comparison::Equals => row[idx] == target,
            Comparison::NotEquals => row[idx] != target,
        })
        .count() as u64;
    debug!(
        "count_matching: field {:?} {:?} {:?}: {}",
        field, comparison, target, count
    );
    Ok(count)
}

/// The raw values of a free-text field, one per row, in table order.
pub fn free_text(table: &Table, field: &str) -> Result<Vec<String>, TallyErrors> {
    let idx = table.column_index(field)?;
    Ok(table.rows.iter().map(|row| row[idx].clone()).collect())
}

/// Attaches to each count its percentage of the total.
pub fn with_shares(counts: &[FieldCount]) -> Vec<FieldShare> {
    let total: u64 = counts.iter().map(|fc| fc.count).sum();
    counts
        .iter()
        .map(|fc| FieldShare {
            label: fc.label.clone(),
            count: fc.count,
            percent: if total == 0 {
                0.0
            } else {
                (fc.count as f64) * 100.0 / (total as f64)
            },
        })
        .collect()
}

// Counts the labels, keeping the order of first appearance for ties.
fn sorted_counts<K: Eq + Hash + Clone>(
    labels: impl Iterator<Item = K>,
    order: SortOrder,
) -> Vec<(K, u64)> {
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, u64)> = Vec::new();
    for label in labels {
        if let Some(&idx) = positions.get(&label) {
            counts[idx].1 += 1;
        } else {
            positions.insert(label.clone(), counts.len());
            counts.push((label, 1));
        }
    }
    // Both sorts are stable.
    match order {
        SortOrder::Descending => counts.sort_by(|a, b| b.1.cmp(&a.1)),
        SortOrder::Ascending => counts.sort_by_key(|p| p.1),
    }
    counts
}
