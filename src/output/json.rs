use super::InfoReport;
use anyhow::Result;

/// Pretty-printed JSON for one report, with a trailing newline.
pub fn render_json(report: &InfoReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

pub fn print_json(report: &InfoReport) -> Result<()> {
    print!("{}", render_json(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddonInfo, ExtInfo, PackageKind};
    use std::path::Path;

    #[test]
    fn test_render_json_round_trips() {
        let ext = ExtInfo::new(
            AddonInfo::new("addon@example.com", "Example", "2.0"),
            PackageKind::Dir,
        );
        let report = InfoReport::new(Path::new("ext"), ext);

        let text = render_json(&report).unwrap();
        assert!(text.ends_with("}\n"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["identifier"], "addon@example.com");
        assert_eq!(value["type"], "dir");
        assert_eq!(value["version"], "2.0");
    }
}
