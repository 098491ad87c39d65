//! Mobile viewport configuration.

use crate::error_handling::RuleError;
use crate::model::Finding;

use super::RuleContext;

pub const VIEWPORT: &str = "viewport";

/// Viewport meta tag: pass only when it sets both `width=device-width` and
/// `initial-scale=1`; absent or missing either one -> fail.
pub fn check_viewport(content: Option<&str>) -> Finding {
    let Some(content) = content else {
        return Finding::fail(VIEWPORT, "No viewport meta tag found");
    };

    let mut device_width = false;
    let mut unit_scale = false;
    for part in content.split([',', ';']) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();
        match key.as_str() {
            "width" => device_width |= value == "device-width",
            "initial-scale" => unit_scale |= value.parse::<f64>().is_ok_and(|s| s == 1.0),
            _ => {}
        }
    }

    if device_width && unit_scale {
        Finding::pass(VIEWPORT, "Viewport is configured for mobile devices").with_text(content)
    } else {
        let mut missing = Vec::new();
        if !device_width {
            missing.push("width=device-width");
        }
        if !unit_scale {
            missing.push("initial-scale=1");
        }
        Finding::fail(
            VIEWPORT,
            format!("Viewport is missing {}", missing.join(" and ")),
        )
        .with_text(content)
    }
}

pub(super) fn viewport_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_viewport(ctx.document.meta_content("viewport"))])
}
