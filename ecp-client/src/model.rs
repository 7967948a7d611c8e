//! Device query responses and their XML parsing.

use crate::error::{EcpError, Result};
use serde::Deserialize;
use xmltree::{Element, XMLNode};

/// Identity of a device as reported by `GET /query/device-info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub serial_number: String,
    pub vendor_name: String,
    pub model_name: String,
    pub default_device_name: String,
    /// Name chosen by the owner; falls back to `default_device_name`
    pub user_device_name: String,
}

/// An installed application (channel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: String,
    pub name: String,
}

impl Application {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Raw `<device-info>` document. Only the fields we use are declared.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeviceInfoXml {
    serial_number: String,
    #[serde(default)]
    vendor_name: Option<String>,
    #[serde(default)]
    model_name: Option<String>,
    #[serde(default)]
    default_device_name: Option<String>,
    #[serde(default)]
    user_device_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DeviceInfo {
    /// Parse a `<device-info>` document.
    ///
    /// # Errors
    ///
    /// Returns `EcpError::Parse` if the XML is malformed or the serial number
    /// is missing or blank.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let raw: DeviceInfoXml = quick_xml::de::from_str(xml)
            .map_err(|e| EcpError::Parse(format!("Failed to parse device-info XML: {}", e)))?;

        let serial_number = raw.serial_number.trim().to_string();
        if serial_number.is_empty() {
            return Err(EcpError::Parse("device-info has an empty serial-number".to_string()));
        }

        let model_name = non_empty(raw.model_name).unwrap_or_else(|| "Roku".to_string());
        let default_device_name = non_empty(raw.default_device_name)
            .unwrap_or_else(|| format!("{} - {}", model_name, serial_number));
        let user_device_name =
            non_empty(raw.user_device_name).unwrap_or_else(|| default_device_name.clone());

        Ok(Self {
            serial_number,
            vendor_name: non_empty(raw.vendor_name).unwrap_or_else(|| "Roku".to_string()),
            model_name,
            default_device_name,
            user_device_name,
        })
    }
}

fn parse_root(xml: &str) -> Result<Element> {
    Element::parse(xml.as_bytes()).map_err(|e| EcpError::Parse(e.to_string()))
}

/// Convert an `<app id="..">Name</app>` element. Elements without an id
/// (the home screen) yield `None`.
fn app_from_element(element: &Element) -> Option<Application> {
    let id = element.attributes.get("id")?.trim();
    if id.is_empty() {
        return None;
    }
    let name = element
        .get_text()
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    Some(Application::new(id, name))
}

/// Parse the `<apps>` document returned by `GET /query/apps`.
pub fn parse_apps(xml: &str) -> Result<Vec<Application>> {
    let root = parse_root(xml)?;
    if root.name != "apps" {
        return Err(EcpError::Parse(format!("Expected <apps>, found <{}>", root.name)));
    }

    Ok(root
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(el) if el.name == "app" => app_from_element(el),
            _ => None,
        })
        .collect())
}

/// Parse the `<active-app>` document returned by `GET /query/active-app`.
pub fn parse_active_app(xml: &str) -> Result<Option<Application>> {
    let root = parse_root(xml)?;
    if root.name != "active-app" {
        return Err(EcpError::Parse(format!(
            "Expected <active-app>, found <{}>",
            root.name
        )));
    }

    Ok(root.get_child("app").and_then(app_from_element))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_INFO: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<device-info>
    <udn>28001240-0000-1000-8000-b0a737a4c1e2</udn>
    <serial-number>X00400ABCDEF</serial-number>
    <device-id>S00820ABCDEF</device-id>
    <vendor-name>Roku</vendor-name>
    <model-number>3930X</model-number>
    <model-name>Roku Express</model-name>
    <user-device-name>Den</user-device-name>
    <default-device-name>Roku Express - X00400ABCDEF</default-device-name>
    <software-version>11.5.0</software-version>
</device-info>"#;

    #[test]
    fn test_device_info_from_xml() {
        let info = DeviceInfo::from_xml(DEVICE_INFO).unwrap();
        assert_eq!(info.serial_number, "X00400ABCDEF");
        assert_eq!(info.vendor_name, "Roku");
        assert_eq!(info.model_name, "Roku Express");
        assert_eq!(info.user_device_name, "Den");
        assert_eq!(info.default_device_name, "Roku Express - X00400ABCDEF");
    }

    #[test]
    fn test_device_info_user_name_falls_back_to_default() {
        let xml = r#"<device-info>
    <serial-number>YH009E000001</serial-number>
    <vendor-name>TCL</vendor-name>
    <model-name>TCL Roku TV</model-name>
    <default-device-name>TCL Roku TV - YH009E000001</default-device-name>
</device-info>"#;
        let info = DeviceInfo::from_xml(xml).unwrap();
        assert_eq!(info.user_device_name, "TCL Roku TV - YH009E000001");
        assert_eq!(info.vendor_name, "TCL");
    }

    #[test]
    fn test_device_info_without_serial_is_rejected() {
        let xml = "<device-info><model-name>Roku</model-name></device-info>";
        assert!(matches!(DeviceInfo::from_xml(xml), Err(EcpError::Parse(_))));
    }

    #[test]
    fn test_parse_apps() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
<apps>
    <app id="31012" type="menu" version="2.0.62">FandangoNOW Movies &amp; TV</app>
    <app id="12" type="appl" version="4.2.81179053">Netflix</app>
    <app id="tvinput.hdmi1" type="tvin" version="1.0.0">HDMI 1</app>
</apps>"#;
        let apps = parse_apps(xml).unwrap();
        assert_eq!(apps.len(), 3);
        assert_eq!(apps[0], Application::new("31012", "FandangoNOW Movies & TV"));
        assert_eq!(apps[1], Application::new("12", "Netflix"));
        assert_eq!(apps[2].id, "tvinput.hdmi1");
    }

    #[test]
    fn test_parse_apps_empty() {
        assert!(parse_apps("<apps></apps>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_apps_wrong_root() {
        assert!(parse_apps("<active-app/>").is_err());
    }

    #[test]
    fn test_parse_active_app() {
        let xml = r#"<active-app><app id="12" type="appl" version="4.2">Netflix</app></active-app>"#;
        assert_eq!(
            parse_active_app(xml).unwrap(),
            Some(Application::new("12", "Netflix"))
        );
    }

    #[test]
    fn test_parse_active_app_home_screen() {
        let xml = "<active-app><app>Roku</app></active-app>";
        assert_eq!(parse_active_app(xml).unwrap(), None);
    }

    #[test]
    fn test_parse_active_app_with_screensaver() {
        let xml = r#"<active-app>
    <app id="12" type="appl">Netflix</app>
    <screensaver id="55545" type="ssvr">Default screensaver</screensaver>
</active-app>"#;
        assert_eq!(parse_active_app(xml).unwrap().map(|a| a.id), Some("12".to_string()));
    }
}
