use crate::specs::SpecCatalog;
use crate::table::PerformanceTable;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// 이보다 기록이 적은 특성은 리포트에서 뺍니다.
pub const MIN_SAMPLES: usize = 5;

/// (임계값, 임계값을 넘은 기록 수)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileBucket {
    pub p: f64,
    pub n: usize,
}

/// 전체 기록 수. 임계값은 항상 정수 0으로 직렬화합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalBucket {
    pub p: u32,
    pub n: usize,
}

/// 특성 하나의 분포. 직렬화 순서는 필드 선언 순서를 따릅니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecBreakdown {
    pub max: PercentileBucket,
    pub p99: PercentileBucket,
    pub p95: PercentileBucket,
    pub p90: PercentileBucket,
    pub p75: PercentileBucket,
    pub p50: PercentileBucket,
    pub p10: PercentileBucket,
    pub all: TotalBucket,
}

impl SpecBreakdown {
    /// `values` must be sorted ascending and non-empty.
    fn from_sorted(values: &[f64]) -> Self {
        let max = values[values.len() - 1];
        Self {
            max: PercentileBucket { p: max, n: 0 },
            p99: percentile_bucket(values, 99.0),
            p95: percentile_bucket(values, 95.0),
            p90: percentile_bucket(values, 90.0),
            p75: percentile_bucket(values, 75.0),
            p50: percentile_bucket(values, 50.0),
            p10: percentile_bucket(values, 10.0),
            all: TotalBucket { p: 0, n: values.len() },
        }
    }
}

/// 특성 slug -> 분포
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BossReport(pub BTreeMap<String, SpecBreakdown>);

impl BossReport {
    pub fn get(&self, slug: &str) -> Option<&SpecBreakdown> {
        self.0.get(slug)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Linear interpolation between the two nearest order statistics.
pub fn percentile_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let n = sorted.len();
    let rank = percentile / 100.0 * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

/// 소수 둘째 자리까지, 정확히 반인 경우는 짝수 쪽으로 (1.125 -> 1.12)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

pub fn n_greater_than(values: &[f64], threshold: f64) -> usize {
    values.iter().filter(|&&v| v > threshold).count()
}

/// 반올림한 임계값을 기준으로 그보다 높은 기록 수를 셉니다.
fn percentile_bucket(sorted: &[f64], percentile: f64) -> PercentileBucket {
    let p = round2(percentile_sorted(sorted, percentile));
    PercentileBucket {
        p,
        n: n_greater_than(sorted, p),
    }
}

pub fn boss_report(table: &PerformanceTable, catalog: &SpecCatalog) -> BossReport {
    if table.is_empty() {
        return BossReport::default();
    }

    let started = Instant::now();

    let mut dropped = 0usize;
    let mut by_spec: HashMap<usize, Vec<f64>> = HashMap::new();
    for row in table.rows() {
        if !row.is_well_formed() {
            dropped += 1;
            continue;
        }

        let spec_index = row.spec_index as usize;
        if !catalog.is_valid(spec_index) {
            continue;
        }

        by_spec.entry(spec_index).or_default().push(row.dps());
    }

    if dropped > 0 {
        tracing::warn!("dropped {} malformed rows out of {}", dropped, table.len());
    }

    let mut report = BTreeMap::new();
    for (spec_index, mut values) in by_spec {
        if values.len() < MIN_SAMPLES {
            continue;
        }

        let slug = match catalog.slug(spec_index) {
            Some(slug) => slug,
            None => continue,
        };

        values.sort_by(|a, b| a.total_cmp(b));
        report.insert(slug.to_string(), SpecBreakdown::from_sorted(&values));
    }

    tracing::debug!(
        "aggregated {} rows into {} specs in {:?}",
        table.len(),
        report.len(),
        started.elapsed()
    );
    BossReport(report)
}
