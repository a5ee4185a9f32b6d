//! Criterion benchmarks for the settings patcher.
//!
//! The patcher runs over whole settings files; `ProfileOptions_profile` on a
//! long-lived install can reach a few thousand lines, so the interesting
//! question is how parse + apply + render scales with document size.
//!
//! Run with:
//! ```bash
//! cargo bench --package swfix-core --bench patch_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swfix_core::{complete_fix_plans, EditBatch, SettingsDocument};

// ── Fixture builders ──────────────────────────────────────────────────────────

/// Builds a profile-like document with `n` unrelated settings lines plus a
/// handful of stale lines that the fix batches will replace.
fn build_document_text(n: usize) -> String {
    let mut lines = Vec::with_capacity(n + 3);
    for i in 0..n {
        lines.push(format!("GstKeyBinding.Slot{i} {i}"));
    }
    lines.push("GstRender.Dx12Enabled 0".to_string());
    lines.push("GstRender.ResolutionScale 0.750000".to_string());
    lines.push("GstRender.UI.FilterMode 1".to_string());
    lines.join("\n")
}

/// The union of every batch in the complete fix, as one batch.
fn combined_fix_batch() -> EditBatch {
    let mut batch = EditBatch::new();
    for plan in complete_fix_plans() {
        for edit in plan.batch.edits() {
            batch.push(edit.clone());
        }
    }
    batch
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for n in [10usize, 100, 1000] {
        let text = build_document_text(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &text, |b, text| {
            b.iter(|| SettingsDocument::parse(black_box(text)));
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let batch = combined_fix_batch();
    let mut group = c.benchmark_group("apply");
    for n in [10usize, 100, 1000] {
        let doc = SettingsDocument::parse(&build_document_text(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &doc, |b, doc| {
            b.iter(|| {
                let mut d = doc.clone();
                d.apply(black_box(&batch));
                d
            });
        });
    }
    group.finish();
}

fn bench_full_patch_cycle(c: &mut Criterion) {
    let batch = combined_fix_batch();
    let text = build_document_text(1000);
    c.bench_function("parse_apply_render_1000_lines", |b| {
        b.iter(|| {
            let mut doc = SettingsDocument::parse(black_box(&text));
            doc.apply(&batch);
            doc.render()
        });
    });
}

criterion_group!(benches, bench_parse, bench_apply, bench_full_patch_cycle);
criterion_main!(benches);
