use std::collections::HashMap;

use crate::geometry::bounds::Bounds;
use crate::ocr::block::OcrTextBlock;

/// Two boxes sit on the same text line and close enough to be one run:
/// their vertical ranges overlap by more than half the shorter box's
/// height, and the horizontal gap is smaller than that height.
pub fn same_text_run(a: &Bounds, b: &Bounds) -> bool {
    let shorter = a.height().min(b.height());
    if shorter <= 0 {
        return false;
    }

    let vertical_overlap = i64::from(a.bottom.min(b.bottom)) - i64::from(a.top.max(b.top));
    let horizontal_gap = (i64::from(a.left.max(b.left)) - i64::from(a.right.min(b.right))).max(0);

    2 * vertical_overlap > shorter && horizontal_gap < shorter
}

struct Run {
    bounds: Bounds,
    parts: Vec<OcrTextBlock>,
}

/// Merge OCR boxes that one visual word run was split into.
///
/// Blocks are grouped by the transitive closure of [`same_text_run`] over
/// the input boxes; a merged box never qualifies a block on its own. Each
/// merged block spans its parts, joins their texts left to right with
/// `separator`, averages their confidence and keeps the leftmost part's
/// engine. Output keeps the order of each run's earliest input block.
pub fn consolidate_blocks(blocks: &[OcrTextBlock], separator: &str) -> Vec<OcrTextBlock> {
    let mut parent: Vec<usize> = (0..blocks.len()).collect();
    for i in 0..blocks.len() {
        for j in (i + 1)..blocks.len() {
            if same_text_run(&blocks[i].bounds, &blocks[j].bounds) {
                join(&mut parent, i, j);
            }
        }
    }

    let mut runs: Vec<Run> = Vec::new();
    let mut run_of_root: HashMap<usize, usize> = HashMap::new();
    for (i, block) in blocks.iter().enumerate() {
        let root = find_root(&mut parent, i);
        match run_of_root.get(&root) {
            Some(&r) => {
                let run = &mut runs[r];
                run.bounds = run.bounds.union(&block.bounds);
                run.parts.push(block.clone());
            }
            None => {
                run_of_root.insert(root, runs.len());
                runs.push(Run {
                    bounds: block.bounds,
                    parts: vec![block.clone()],
                });
            }
        }
    }

    if runs.len() < blocks.len() {
        tracing::debug!(
            input = blocks.len(),
            output = runs.len(),
            "consolidated OCR blocks"
        );
    }

    runs.into_iter().map(|run| finish(run, separator)).collect()
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn join(parent: &mut [usize], a: usize, b: usize) {
    let ra = find_root(parent, a);
    let rb = find_root(parent, b);
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}

fn finish(mut run: Run, separator: &str) -> OcrTextBlock {
    if run.parts.len() == 1 {
        return run.parts.remove(0);
    }

    run.parts.sort_by_key(|p| (p.bounds.left, p.bounds.top));

    let text = run
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    let confidence = run.parts.iter().map(|p| p.confidence).sum::<f64>() / run.parts.len() as f64;

    OcrTextBlock {
        bounds: run.bounds,
        text,
        confidence,
        source_engine: run.parts[0].source_engine.clone(),
    }
}
