use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// A stage whose mean time grew past the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene: String,
    pub stage: &'static str,
    pub pct_change: f64,
}

/// Load a baseline from a JSON file. Returns None if the file doesn't exist.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

fn pct_change(current: f64, base: f64) -> Option<f64> {
    (base > 0.0).then(|| (current - base) / base * 100.0)
}

/// Compare current results against a baseline, stage by stage.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };

        let stages = [
            ("upload", result.upload.mean_ms, base.upload.mean_ms),
            ("build", result.build.mean_ms, base.build.mean_ms),
        ];
        for (stage, now, before) in stages {
            if let Some(pct) = pct_change(now, before) {
                if pct > threshold_pct {
                    regressions.push(Regression {
                        scene: result.scene_name.clone(),
                        stage,
                        pct_change: pct,
                    });
                }
            }
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Chunks | Quads | Draws | Upload mean (ms) | Upload P95 (ms) | Build mean (ms) | Build median (ms) | Build P95 (ms) | Build P99 (ms) | Build min (ms) | Build max (ms) |\n");
    out.push_str("|-------|--------|-------|-------|------------------|-----------------|-----------------|-------------------|----------------|----------------|----------------|----------------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.2} | {:.2} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |\n",
            r.scene_name,
            r.chunk_count,
            r.quad_count,
            r.draw_count,
            r.upload.mean_ms,
            r.upload.p95_ms,
            r.build.mean_ms,
            r.build.median_ms,
            r.build.p95_ms,
            r.build.p99_ms,
            r.build.min_ms,
            r.build.max_ms,
        ));
    }

    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for r in regressions {
        out.push_str(&format!("  - {} [{}]: +{:.1}%\n", r.scene, r.stage, r.pct_change));
    }
    out
}
