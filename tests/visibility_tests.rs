use uitree_inspect::tree::element::StructuralPath;
use uitree_inspect::visibility::analyzer::{
    Edge, VisibilityClass, VisibilityOptions, compute_visibility, compute_visibility_with,
};

mod common;
use common::{SETTINGS_BEFORE, rect, tree, under_list};

#[test]
fn partially_visible_element_is_clipped_to_viewport() {
    let t = tree(r#"<node class="View" bounds="[150,150][250,250]"/>"#);
    let report = compute_visibility(&t, &rect(0, 0, 200, 200));

    let v = &report.entries()[0];
    assert_eq!(v.visible_bounds, Some(rect(150, 150, 200, 200)));
    assert!((v.visible_ratio - 0.25).abs() < 1e-12);
    assert_eq!(v.class, VisibilityClass::Partial);
    assert_eq!(v.offscreen_edges, vec![Edge::Right, Edge::Bottom]);
}

#[test]
fn inside_element_is_fully_visible_and_outside_is_hidden() {
    let xml = r#"<root bounds="[0,0][1000,1000]">
      <node class="In" bounds="[10,10][50,50]"/>
      <node class="Out" bounds="[500,500][600,600]"/>
    </root>"#;
    let t = tree(xml);
    let report = compute_visibility(&t, &rect(0, 0, 200, 200));

    let inside = report.get(&StructuralPath::parse("root[0]/In[0]").unwrap()).unwrap();
    assert_eq!(inside.visible_ratio, 1.0);
    assert_eq!(inside.class, VisibilityClass::Full);
    assert!(inside.offscreen_edges.is_empty());

    let outside = report.get(&StructuralPath::parse("root[0]/Out[0]").unwrap()).unwrap();
    assert_eq!(outside.visible_ratio, 0.0);
    assert_eq!(outside.visible_bounds, None);
    assert_eq!(outside.class, VisibilityClass::Hidden);
    assert!(!outside.is_visible());
}

#[test]
fn every_ratio_is_in_unit_interval() {
    let t = tree(SETTINGS_BEFORE);
    for viewport in [rect(0, 0, 1080, 1920), rect(0, 0, 540, 960), rect(0, 1750, 1080, 3000), rect(-10, -10, 0, 0)] {
        let report = compute_visibility(&t, &viewport);
        assert_eq!(report.entries().len(), t.len());
        for v in report.entries() {
            assert!(
                (0.0..=1.0).contains(&v.visible_ratio),
                "{} has ratio {} in {}",
                v.path(),
                v.visible_ratio,
                viewport
            );
        }
    }
}

#[test]
fn touching_edge_counts_as_hidden() {
    let t = tree(r#"<node class="Below" bounds="[0,200][100,300]"/>"#);
    let report = compute_visibility(&t, &rect(0, 0, 100, 200));
    let v = &report.entries()[0];
    assert_eq!(v.visible_ratio, 0.0);
    assert_eq!(v.class, VisibilityClass::Hidden);
    assert_eq!(v.visible_bounds.map(|b| b.area()), Some(0));
}

#[test]
fn degenerate_element_is_hidden() {
    let t = tree(r#"<root bounds="[0,0][100,100]"><node class="Line" bounds="[10,10][10,90]"/></root>"#);
    let report = compute_visibility(&t, &rect(0, 0, 100, 100));
    let line = &report.entries()[1];
    assert_eq!(line.visible_ratio, 0.0);
    assert_eq!(line.class, VisibilityClass::Hidden);
}

#[test]
fn full_threshold_separates_full_from_partial() {
    let t = tree(r#"<node class="Card" bounds="[0,0][100,100]"/>"#);
    let viewport = rect(0, 5, 100, 200);

    let default = compute_visibility(&t, &viewport);
    assert_eq!(default.entries()[0].class, VisibilityClass::Full, "0.95 >= 0.9");

    let strict = compute_visibility_with(&t, &viewport, &VisibilityOptions { full_threshold: 1.0 });
    assert_eq!(strict.entries()[0].class, VisibilityClass::Partial);
}

#[test]
fn status_bar_shifted_viewport_clips_footer() {
    let t = tree(SETTINGS_BEFORE);
    // 1080x1800 screenshot taken below a 63px status bar.
    let viewport = rect(0, 0, 1080, 1800).translate(0, 63);
    let report = compute_visibility(&t, &viewport);

    let footer = report
        .get(&StructuralPath::parse(&under_list("android.widget.TextView[1]")).unwrap())
        .unwrap();
    assert_eq!(footer.visible_bounds, Some(rect(40, 1850, 1040, 1863)));
    assert_eq!(footer.class, VisibilityClass::Partial);
    assert_eq!(footer.offscreen_edges, vec![Edge::Bottom]);

    let title = report
        .get(&StructuralPath::parse(&under_list("android.widget.TextView[0]")).unwrap())
        .unwrap();
    assert_eq!(title.class, VisibilityClass::Full);
}

#[test]
fn summary_counts_each_class() {
    let t = tree(SETTINGS_BEFORE);
    let report = compute_visibility(&t, &rect(0, 0, 1080, 1760));
    let summary = report.summary();

    assert_eq!(summary.total, 7);
    assert_eq!(summary.full + summary.partial + summary.hidden, summary.total);
    assert_eq!(summary.hidden, 1, "footer starts below 1760");
    assert_eq!(report.visible().count(), 6);
}

#[test]
fn nothing_visible_is_reported_not_fatal() {
    let t = tree(SETTINGS_BEFORE);
    let viewport = rect(2000, 2000, 3000, 3000);
    let report = compute_visibility(&t, &viewport);

    assert_eq!(report.entries().len(), 7);
    let err = report.ensure_any_visible().unwrap_err();
    assert_eq!(err.viewport, viewport);

    assert!(compute_visibility(&t, &rect(0, 0, 10, 10)).ensure_any_visible().is_ok());
}

#[test]
fn report_is_keyed_by_structural_path() {
    let t = tree(SETTINGS_BEFORE);
    let report = compute_visibility(&t, &t.screen_bounds());
    for el in t.flatten() {
        let v = report.get(&el.path).unwrap();
        assert_eq!(v.element.path, el.path);
    }
}
