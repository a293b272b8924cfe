//! Static content markup for the built-in simulated apps.

pub(crate) fn my_computer() -> String {
    concat!(
        r#"<div class="file-explorer-content">"#,
        r#"<div class="fe-sidebar"><h4>Favourites</h4><ul>"#,
        r#"<li data-location="desktop">Desktop</li><li data-location="downloads">Downloads</li>"#,
        r#"<li data-location="documents">Documents</li><li data-location="pictures">Pictures</li>"#,
        r#"</ul><h4>This PC</h4><ul><li class="active" data-location="thispc">This PC</li></ul></div>"#,
        r#"<div class="fe-main"><div class="fe-section-title">Devices and drives (3)</div>"#,
        r#"<div class="fe-items-grid"><div class="fe-item"><span>Local Disk (C:)</span></div>"#,
        r#"<div class="fe-item"><span>DVD RW Drive (D:)</span></div>"#,
        r#"<div class="fe-item"><span>Network Drive (Z:)</span></div></div></div></div>"#,
    )
    .to_string()
}

pub(crate) fn recycle_bin() -> String {
    r#"<div class="recycle-bin-content"><p>Recycle Bin is empty</p></div>"#.to_string()
}

pub(crate) fn notepad() -> String {
    r#"<textarea class="notepad-content" spellcheck="false"></textarea>"#.to_string()
}

pub(crate) fn calculator() -> String {
    let keys = [
        "%", "CE", "C", "/", "7", "8", "9", "*", "4", "5", "6", "-", "1", "2", "3", "+", "+/-",
        "0", ".", "=",
    ];
    let buttons: String = keys
        .iter()
        .map(|key| format!("<button>{key}</button>"))
        .collect();
    format!(
        r#"<div class="calculator-content"><div class="calc-display">0</div><div class="calc-buttons">{buttons}</div></div>"#
    )
}

pub(crate) fn settings() -> String {
    concat!(
        r#"<div class="settings-content">"#,
        r#"<section class="settings-section" data-section="personalization">"#,
        r#"<label for="wallpaper-url">Background image URL</label>"#,
        r#"<input id="wallpaper-url" type="text" placeholder="https://...">"#,
        r#"<button class="apply-wallpaper">Apply</button>"#,
        r#"<div class="accent-swatches"></div></section></div>"#,
    )
    .to_string()
}

/// Content for windows without a dedicated app, escaped for direct insertion.
pub(crate) fn placeholder(title: &str) -> String {
    let escaped = title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(r#"<div class="placeholder-content">Content for {escaped}</div>"#)
}
