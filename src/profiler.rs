use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Totals for one named section.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionStats {
    pub total: Duration,
    pub hits: u64,
}

impl SectionStats {
    pub fn mean(&self) -> Duration {
        if self.hits == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos((self.total.as_nanos() / u128::from(self.hits)) as u64)
        }
    }
}

/// Cumulative wall time and hit count per named section.
#[derive(Default)]
pub struct Profiler {
    pub sections: HashMap<&'static str, SectionStats>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&mut self, guard: &ProfilerGuard) {
        let stats = self.sections.entry(guard.name).or_default();
        stats.total += guard.start.elapsed();
        stats.hits += 1;
    }

    /// Sections ordered by total time, slowest first.
    pub fn report_sorted(&self) -> Vec<(&'static str, SectionStats)> {
        let mut v: Vec<_> = self.sections.iter().map(|(n, s)| (*n, *s)).collect();
        v.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        v
    }

    /// Emit one `info` event per section and start over with an empty table.
    /// Called once at shutdown when the `profiling` feature is on.
    pub fn log_and_clear(&mut self) {
        for (name, stats) in self.report_sorted() {
            tracing::info!(
                section = name,
                total = ?stats.total,
                mean = ?stats.mean(),
                hits = stats.hits,
                "profile"
            );
        }
        self.sections.clear();
    }
}

pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section. The guard records into the global profiler
/// when dropped.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard { name, start: Instant::now() }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().finish(self);
    }
}

/// Profile the enclosing scope when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_accumulate() {
        let mut p = Profiler::new();
        let g = start("a");
        p.finish(&g);
        p.finish(&g);
        p.finish(&start("b"));
        let report = p.report_sorted();
        assert_eq!(report.len(), 2);
        let a = report.iter().find(|r| r.0 == "a").unwrap();
        assert_eq!(a.1.hits, 2);
        assert!(report[0].1.total >= report[1].1.total);
        p.log_and_clear();
        assert!(p.sections.is_empty());
    }

    #[test]
    fn mean_of_unhit_section_is_zero() {
        assert_eq!(SectionStats::default().mean(), Duration::ZERO);
        let stats = SectionStats {
            total: Duration::from_millis(30),
            hits: 3,
        };
        assert_eq!(stats.mean(), Duration::from_millis(10));
    }
}
