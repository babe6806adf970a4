use std::collections::{BTreeSet, HashMap};

use uitree_inspect::diff::differ::{
    ChangedField, DiffEntry, DiffKind, DiffOptions, DiffSummary, MatchPass, diff, diff_with,
};
use uitree_inspect::diff::summary::{SnapshotComparison, TextComparison};

mod common;
use common::{SETTINGS_AFTER, SETTINGS_BEFORE, rect, tree, under_list};

fn paths_of(entries: &[DiffEntry<'_>], kind: DiffKind) -> BTreeSet<String> {
    entries
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.path().unwrap().to_string())
        .collect()
}

fn by_path<'a>(entries: &'a [DiffEntry<'a>]) -> HashMap<String, &'a DiffEntry<'a>> {
    entries
        .iter()
        .map(|e| (e.path().unwrap().to_string(), e))
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn self_diff_is_all_unchanged() {
    let t = tree(SETTINGS_BEFORE);
    let entries = diff(&t, &t);

    assert_eq!(entries.len(), t.len());
    assert!(entries.iter().all(|e| e.kind == DiffKind::Unchanged));
    assert!(entries.iter().all(|e| e.changed_fields.is_empty()));
    assert!(!DiffSummary::from_entries(&entries).has_changes());
}

#[test]
fn added_and_removed_swap_when_arguments_swap() {
    let before = tree(SETTINGS_BEFORE);
    let after = tree(SETTINGS_AFTER);

    let forward = diff(&before, &after);
    let backward = diff(&after, &before);

    assert_eq!(
        paths_of(&forward, DiffKind::Added),
        paths_of(&backward, DiffKind::Removed)
    );
    assert_eq!(
        paths_of(&forward, DiffKind::Removed),
        paths_of(&backward, DiffKind::Added)
    );
    assert!(!paths_of(&forward, DiffKind::Added).is_empty());
}

#[test]
fn diff_is_deterministic() {
    let before = tree(SETTINGS_BEFORE);
    let after = tree(SETTINGS_AFTER);
    assert_eq!(diff(&before, &after), diff(&before, &after));
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn resized_button_is_modified_bounds_only() {
    let a = tree(r#"<node class="Button" resource-id="btn_ok" bounds="[0,0][100,50]"/>"#);
    let b = tree(r#"<node class="Button" resource-id="btn_ok" bounds="[0,0][100,60]"/>"#);

    let entries = diff(&a, &b);
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.kind, DiffKind::Modified);
    assert_eq!(entry.changed_fields, BTreeSet::from([ChangedField::Bounds]));
    assert_eq!(entry.matched_by, Some(MatchPass::ResourceId));
}

#[test]
fn settings_screen_changes_are_classified() {
    let before = tree(SETTINGS_BEFORE);
    let after = tree(SETTINGS_AFTER);
    let entries = diff(&before, &after);
    let map = by_path(&entries);

    let title = map[&under_list("android.widget.TextView[0]")];
    assert_eq!(title.kind, DiffKind::Modified);
    assert_eq!(title.changed_fields, BTreeSet::from([ChangedField::Text]));
    assert_eq!(title.matched_by, Some(MatchPass::ResourceId));

    let ok = map[&under_list("android.widget.Button[0]")];
    assert_eq!(ok.kind, DiffKind::Modified);
    assert_eq!(ok.changed_fields, BTreeSet::from([ChangedField::Bounds]));

    let wifi = map[&under_list("android.widget.Switch[0]")];
    assert_eq!(wifi.kind, DiffKind::Added);
    assert!(wifi.before.is_none());

    let cancel = map[&under_list("android.widget.Button[1]")];
    assert_eq!(cancel.kind, DiffKind::Removed);
    assert_eq!(cancel.before.unwrap().text, "Cancel");

    let footer = map[&under_list("android.widget.TextView[1]")];
    assert_eq!(footer.kind, DiffKind::Unchanged);
    assert_eq!(footer.matched_by, Some(MatchPass::StructuralPath));

    let summary = DiffSummary::from_entries(&entries);
    assert_eq!(
        summary,
        DiffSummary {
            added: 1,
            removed: 1,
            modified: 2,
            unchanged: 4,
        }
    );
}

#[test]
fn entries_follow_after_preorder_then_removals() {
    let before = tree(SETTINGS_BEFORE);
    let after = tree(SETTINGS_AFTER);
    let entries = diff(&before, &after);

    let after_paths: Vec<String> = after.flatten().iter().map(|e| e.path.to_string()).collect();
    let head: Vec<String> = entries[..after_paths.len()]
        .iter()
        .map(|e| e.after.unwrap().path.to_string())
        .collect();
    assert_eq!(head, after_paths);
    assert!(entries[after_paths.len()..].iter().all(|e| e.kind == DiffKind::Removed));
}

// ============================================================================
// Individual passes
// ============================================================================

#[test]
fn resource_id_pass_follows_element_across_positions() {
    let a = tree(
        r#"<root bounds="[0,0][100,100]">
          <node class="Text" resource-id="hint" text="Hi" bounds="[0,0][50,10]"/>
          <node class="Text" resource-id="name" text="Ann" bounds="[0,20][50,30]"/>
        </root>"#,
    );
    let b = tree(
        r#"<root bounds="[0,0][100,100]">
          <node class="Text" resource-id="name" text="Ann" bounds="[0,0][50,10]"/>
        </root>"#,
    );

    let entries = diff(&a, &b);
    let name = entries.iter().find(|e| e.after.is_some_and(|el| el.resource_id == "name")).unwrap();
    assert_eq!(name.matched_by, Some(MatchPass::ResourceId));
    assert_eq!(name.before.unwrap().path.to_string(), "root[0]/Text[1]");
    assert_eq!(name.changed_fields, BTreeSet::from([ChangedField::Bounds]));

    let removed = paths_of(&entries, DiffKind::Removed);
    assert_eq!(removed, BTreeSet::from(["root[0]/Text[0]".to_string()]));
}

#[test]
fn duplicated_resource_ids_fall_through_to_path_matching() {
    let xml = r#"<root bounds="[0,0][100,100]">
      <node class="Item" resource-id="row" text="one" bounds="[0,0][100,10]"/>
      <node class="Item" resource-id="row" text="two" bounds="[0,10][100,20]"/>
    </root>"#;
    let t = tree(xml);
    let entries = diff(&t, &t);

    let rows: Vec<_> = entries.iter().filter(|e| e.after.unwrap().class_name == "Item").collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|e| e.matched_by == Some(MatchPass::StructuralPath)));
    assert!(rows.iter().all(|e| e.kind == DiffKind::Unchanged));
}

#[test]
fn path_pass_runs_before_geometric_pass() {
    // A label inserted ahead of its same-class sibling takes over the
    // sibling's path, even though geometry would have paired it otherwise.
    let a = tree(
        r#"<root bounds="[0,0][500,500]">
          <node class="Label" text="Total" bounds="[0,100][200,140]"/>
        </root>"#,
    );
    let b = tree(
        r#"<root bounds="[0,0][500,500]">
          <node class="Label" text="Banner" bounds="[0,400][200,440]"/>
          <node class="Label" text="Total: 3" bounds="[0,110][200,150]"/>
        </root>"#,
    );

    let entries = diff(&a, &b);
    let map = by_path(&entries);

    let banner = map["root[0]/Label[0]"];
    assert_eq!(banner.matched_by, Some(MatchPass::StructuralPath));
    assert_eq!(banner.before.unwrap().text, "Total");

    let total = map["root[0]/Label[1]"];
    assert_eq!(total.kind, DiffKind::Added, "nothing left on the before side");
}

#[test]
fn geometric_pass_matches_closest_same_class_same_depth() {
    let a = tree(
        r#"<root bounds="[0,0][500,500]">
          <node class="Group" bounds="[0,0][500,250]">
            <node class="Chip" text="A" bounds="[0,0][100,40]"/>
          </node>
        </root>"#,
    );
    let b = tree(
        r#"<root bounds="[0,0][500,500]">
          <node class="Panel" bounds="[0,0][500,250]">
            <node class="Chip" text="A" bounds="[10,5][110,45]"/>
          </node>
        </root>"#,
    );

    let entries = diff(&a, &b);
    let chip = entries
        .iter()
        .find(|e| e.after.is_some_and(|el| el.class_name == "Chip"))
        .unwrap();
    assert_eq!(chip.matched_by, Some(MatchPass::Geometric));
    assert_eq!(chip.kind, DiffKind::Modified);
    assert_eq!(chip.changed_fields, BTreeSet::from([ChangedField::Bounds]));

    // Group vs Panel differ in class, so the geometric pass leaves them apart.
    assert_eq!(
        paths_of(&entries, DiffKind::Added),
        BTreeSet::from(["root[0]/Panel[0]".to_string()])
    );
    assert_eq!(
        paths_of(&entries, DiffKind::Removed),
        BTreeSet::from(["root[0]/Group[0]".to_string()])
    );
}

// Chip centers on one row. Before: a1 at x=100, a2 at x=50, a3 at x=400.
// After: b1 at x=80, b2 at x=110. The reparented group keeps paths from
// lining up, so the chips can only pair geometrically.
const CHIPS_BEFORE: &str = r#"<root bounds="[0,0][500,500]">
  <node class="Group" bounds="[0,0][500,250]">
    <node class="Chip" text="a1" bounds="[95,0][105,10]"/>
    <node class="Chip" text="a2" bounds="[45,0][55,10]"/>
    <node class="Chip" text="a3" bounds="[395,0][405,10]"/>
  </node>
</root>"#;

const CHIPS_AFTER: &str = r#"<root bounds="[0,0][500,500]">
  <node class="Panel" bounds="[0,0][500,250]">
    <node class="Chip" text="b1" bounds="[75,0][85,10]"/>
    <node class="Chip" text="b2" bounds="[105,0][115,10]"/>
  </node>
</root>"#;

fn chip_partner<'a>(entries: &'a [DiffEntry<'a>], after_text: &str) -> &'a str {
    let entry = entries
        .iter()
        .find(|e| e.after.is_some_and(|el| el.text == after_text))
        .unwrap();
    assert_eq!(entry.matched_by, Some(MatchPass::Geometric));
    entry.before.unwrap().text.as_str()
}

#[test]
fn geometric_pass_commits_globally_closest_pair_first() {
    // b1 is nearest to a1 (20px), but a1-b2 (10px) is the closest pair
    // overall, which leaves b1 with a2 (30px).
    let before = tree(CHIPS_BEFORE);
    let after = tree(CHIPS_AFTER);
    let entries = diff(&before, &after);

    assert_eq!(chip_partner(&entries, "b2"), "a1");
    assert_eq!(chip_partner(&entries, "b1"), "a2");

    let removed = paths_of(&entries, DiffKind::Removed);
    assert!(removed.contains("root[0]/Group[0]/Chip[2]"), "a3 is out of reach");
}

#[test]
fn geometric_pass_added_and_removed_swap_when_arguments_swap() {
    let before = tree(CHIPS_BEFORE);
    let after = tree(CHIPS_AFTER);

    let forward = diff(&before, &after);
    let backward = diff(&after, &before);

    assert_eq!(
        paths_of(&forward, DiffKind::Added),
        paths_of(&backward, DiffKind::Removed)
    );
    assert_eq!(
        paths_of(&forward, DiffKind::Removed),
        paths_of(&backward, DiffKind::Added)
    );
    assert_eq!(chip_partner(&backward, "a1"), "b2");
    assert_eq!(chip_partner(&backward, "a2"), "b1");
}

#[test]
fn geometric_pass_respects_distance_limit() {
    let a = tree(
        r#"<root bounds="[0,0][1000,1000]"><node class="Box" bounds="[0,0][10,10]">
          <node class="Chip" bounds="[0,0][10,10]"/></node></root>"#,
    );
    let b = tree(
        r#"<root bounds="[0,0][1000,1000]"><node class="Frame" bounds="[0,0][10,10]">
          <node class="Chip" bounds="[100,0][110,10]"/></node></root>"#,
    );

    let near = diff_with(&a, &b, &DiffOptions { max_center_distance: 200.0 });
    assert!(near.iter().any(|e| e.matched_by == Some(MatchPass::Geometric)));

    let far = diff(&a, &b);
    assert!(far.iter().all(|e| e.matched_by != Some(MatchPass::Geometric)));
    assert_eq!(paths_of(&far, DiffKind::Added).len(), 2);
    assert_eq!(paths_of(&far, DiffKind::Removed).len(), 2);

    let exact = diff_with(&a, &b, &DiffOptions { max_center_distance: 100.0 });
    assert!(
        exact.iter().all(|e| e.matched_by != Some(MatchPass::Geometric)),
        "the limit is exclusive"
    );
}

#[test]
fn diff_against_empty_side_is_all_added_or_removed() {
    let single = tree(r#"<root bounds="[0,0][10,10]"/>"#);
    let full = tree(SETTINGS_BEFORE);
    let entries = diff(&single, &full);
    let summary = DiffSummary::from_entries(&entries);
    assert_eq!(summary.added + summary.modified + summary.unchanged, full.len());
    assert_eq!(summary.removed + summary.modified + summary.unchanged, single.len());
}

// ============================================================================
// Whole-snapshot comparison
// ============================================================================

#[test]
fn text_comparison_splits_texts_by_side() {
    let texts = TextComparison::between(&tree(SETTINGS_BEFORE), &tree(SETTINGS_AFTER));
    assert_eq!(texts.common, vec!["Footer", "OK"]);
    assert_eq!(texts.only_before, vec!["Cancel", "Settings"]);
    assert_eq!(texts.only_after, vec!["Preferences", "Wi-Fi"]);
}

#[test]
fn snapshot_comparison_reports_count_deltas() {
    let cmp = SnapshotComparison::between(&tree(SETTINGS_BEFORE), &tree(SETTINGS_AFTER));
    assert_eq!(cmp.before.total, 7);
    assert_eq!(cmp.after.total, 7);
    assert_eq!(cmp.delta.total, 0);
    assert_eq!(cmp.delta.clickable, 0);
    assert_eq!(cmp.after.by_class.get("android.widget.Switch"), Some(&1));
}

#[test]
fn changed_fields_compare_the_four_attributes() {
    use uitree_inspect::diff::differ::changed_fields;

    let a = tree(r#"<node class="A" text="x" content-desc="d" bounds="[0,0][1,1]"/>"#);
    let b = tree(
        r#"<node class="B" text="y" content-desc="e" bounds="[0,0][2,2]" clickable="true"/>"#,
    );
    let fields = changed_fields(a.root(), b.root());
    assert_eq!(
        fields,
        BTreeSet::from([
            ChangedField::Text,
            ChangedField::ContentDescription,
            ChangedField::Bounds,
            ChangedField::ClassName,
        ])
    );
    assert_eq!(rect(0, 0, 1, 1), a.root().bounds);
}
