#![allow(dead_code)]

use red_pather::geometry::rect::Rect;
use red_pather::scan::scan_model::{Element, ElementId, ScanPayload, Strategy};
use serde_json::json;

/// Android login screen: six nodes, three of them interactive.
///
/// Node ids in document order:
/// 0 hierarchy, 1 FrameLayout, 2 LinearLayout, 3 EditText, 4 Button, 5 TextView
pub const LOGIN_SOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hierarchy rotation="0">
  <android.widget.FrameLayout bounds="[0,0][1080,1920]">
    <android.widget.LinearLayout bounds="[0,100][1080,600]">
      <android.widget.EditText resource-id="com.app:id/username" text="" bounds="[100,200][980,300]" />
      <android.widget.Button resource-id="com.app:id/loginButton" text="Log in" bounds="[100,400][980,500]" />
    </android.widget.LinearLayout>
    <android.widget.TextView text="Forgot password?" bounds="[300,700][780,760]" />
  </android.widget.FrameLayout>
</hierarchy>
"#;

pub const USERNAME_LOCATOR: &str = "id=com.app:id/username";
pub const LOGIN_LOCATOR: &str = "id=com.app:id/loginButton";
pub const FORGOT_LOCATOR: &str = "xpath=//android.widget.TextView[@text='Forgot password?']";

pub fn login_scan_json_with_source(source: &str) -> String {
    json!({
        "elements": [
            {
                "coords": {"x": 100, "y": 200, "w": 880, "h": 100},
                "variable": "username",
                "locator": USERNAME_LOCATOR,
                "strategy": "ID",
                "text": ""
            },
            {
                "coords": {"x": 100, "y": 400, "w": 880, "h": 100},
                "variable": "${loginButton}",
                "locator": LOGIN_LOCATOR,
                "strategy": "ID",
                "text": "Log in"
            },
            {
                "coords": {"x": 300, "y": 700, "w": 480, "h": 60},
                "variable": "forgotPassword",
                "locator": FORGOT_LOCATOR,
                "strategy": "TEXT_XP",
                "text": "Forgot password?"
            }
        ],
        "raw_source": source,
        "window_w": 1080,
        "window_h": 1920,
        "page_name": "Login"
    })
    .to_string()
}

pub fn login_scan_json() -> String {
    login_scan_json_with_source(LOGIN_SOURCE)
}

pub fn login_payload() -> ScanPayload {
    ScanPayload::from_json(&login_scan_json()).unwrap()
}

pub fn element(id: usize, locator: &str, bounds: Option<Rect>) -> Element {
    Element {
        id: ElementId(id),
        strategy: Strategy::Id,
        locator_expression: locator.to_string(),
        display_name: format!("el{}", id),
        text: None,
        bounds,
        deleted: false,
    }
}

pub fn three_elements() -> Vec<Element> {
    vec![
        element(0, "id=a", Some(Rect::new(0.0, 0.0, 100.0, 50.0))),
        element(1, "id=b", Some(Rect::new(0.0, 100.0, 100.0, 50.0))),
        element(2, "id=c", None),
    ]
}
