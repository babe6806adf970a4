#![allow(dead_code)]

use uitree_inspect::geometry::bounds::Bounds;
use uitree_inspect::ocr::block::OcrTextBlock;
use uitree_inspect::tree::element_tree::ElementTree;

pub fn rect(left: i32, top: i32, right: i32, bottom: i32) -> Bounds {
    Bounds::new(left, top, right, bottom).unwrap()
}

pub fn tree(xml: &str) -> ElementTree {
    ElementTree::parse(xml).unwrap()
}

pub fn block(bounds: Bounds, text: &str) -> OcrTextBlock {
    OcrTextBlock::new(bounds, text, 0.95)
}

/// Settings screen as dumped before the user toggled anything.
pub const SETTINGS_BEFORE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hierarchy rotation="0">
  <node class="android.widget.FrameLayout" bounds="[0,0][1080,1920]" visible-to-user="true">
    <node class="android.widget.LinearLayout" bounds="[0,0][1080,1920]">
      <node class="android.widget.TextView" resource-id="com.example:id/title" text="Settings" bounds="[40,100][1040,200]" />
      <node class="android.widget.Button" resource-id="com.example:id/ok" text="OK" bounds="[100,1700][500,1800]" clickable="true" />
      <node class="android.widget.Button" resource-id="com.example:id/cancel" text="Cancel" bounds="[580,1700][980,1800]" clickable="true" />
      <node class="android.widget.TextView" text="Footer" bounds="[40,1850][1040,1920]" />
    </node>
  </node>
</hierarchy>
"#;

/// Same screen after a change: title renamed, OK moved up, Cancel gone,
/// a switch appeared.
pub const SETTINGS_AFTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hierarchy rotation="0">
  <node class="android.widget.FrameLayout" bounds="[0,0][1080,1920]" visible-to-user="true">
    <node class="android.widget.LinearLayout" bounds="[0,0][1080,1920]">
      <node class="android.widget.TextView" resource-id="com.example:id/title" text="Preferences" bounds="[40,100][1040,200]" />
      <node class="android.widget.Switch" resource-id="com.example:id/wifi" text="Wi-Fi" bounds="[40,300][1040,400]" clickable="true" />
      <node class="android.widget.Button" resource-id="com.example:id/ok" text="OK" bounds="[100,1650][500,1750]" clickable="true" />
      <node class="android.widget.TextView" text="Footer" bounds="[40,1850][1040,1920]" />
    </node>
  </node>
</hierarchy>
"#;

pub const FRAME: &str = "hierarchy[0]/android.widget.FrameLayout[0]";
pub const LIST: &str = "hierarchy[0]/android.widget.FrameLayout[0]/android.widget.LinearLayout[0]";

pub fn under_list(segment: &str) -> String {
    format!("{}/{}", LIST, segment)
}
