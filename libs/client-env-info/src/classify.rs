//! Device, OS and browser classification from user-agent and vendor strings.
//!
//! Each classifier walks an ordered predicate table and returns the first
//! label that matches, so overlapping tokens (an Edge UA also says `Chrome`,
//! an Android UA also says `Linux`) are resolved by table order.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum viewport width at which a touch device counts as a tablet.
pub const TABLET_MIN_TOUCH_WIDTH: u32 = 768;

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static TABLET_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)tablet|ipad|playbook|silk").expect("static regex should not panic")
});
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static ANDROID_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)android").expect("static regex should not panic")
});
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static MOBI_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?i)mobi").expect("static regex should not panic"));
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static MOBILE_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(
        r"Mobile|iP(hone|od)|Android|BlackBerry|IEMobile|Kindle|Silk-Accelerated|(hpw|web)OS|Opera M(obi|ini)",
    )
    .expect("static regex should not panic")
});
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static IOS_DEVICE_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"iPhone|iPad|iPod").expect("static regex should not panic")
});

/// Device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsFamily {
    Windows,
    MacOS,
    Linux,
    Android,
    #[serde(rename = "iOS")]
    Ios,
    Unknown,
}

impl OsFamily {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOS => "MacOS",
            Self::Linux => "Linux",
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Unknown => crate::model::UNKNOWN,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowserFamily {
    Edge,
    Opera,
    Chrome,
    Firefox,
    Safari,
    #[serde(rename = "IE")]
    InternetExplorer,
    Unknown,
}

impl BrowserFamily {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "Edge",
            Self::Opera => "Opera",
            Self::Chrome => "Chrome",
            Self::Firefox => "Firefox",
            Self::Safari => "Safari",
            Self::InternetExplorer => "IE",
            Self::Unknown => crate::model::UNKNOWN,
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type OsPredicate = fn(&str) -> bool;
type BrowserPredicate = fn(&str, &str) -> bool;

const OS_PREDICATES: &[(OsFamily, OsPredicate)] = &[
    (OsFamily::Windows, |ua| ua.contains("Win")),
    (OsFamily::MacOS, |ua| {
        ua.contains("Mac") && !IOS_DEVICE_REGEX.is_match(ua)
    }),
    (OsFamily::Linux, |ua| {
        ua.contains("Linux") && !ua.contains("Android")
    }),
    (OsFamily::Android, |ua| ua.contains("Android")),
    (OsFamily::Ios, |ua| IOS_DEVICE_REGEX.is_match(ua)),
];

const BROWSER_PREDICATES: &[(BrowserFamily, BrowserPredicate)] = &[
    (BrowserFamily::Edge, |ua, _| {
        ua.contains("Edg/") || ua.contains("Edge/")
    }),
    (BrowserFamily::Opera, |ua, _| {
        ua.contains("OPR/") || ua.contains("Opera")
    }),
    (BrowserFamily::Chrome, |ua, vendor| {
        ua.contains("Chrome") && vendor.contains("Google Inc")
    }),
    (BrowserFamily::Firefox, |ua, _| ua.contains("Firefox")),
    (BrowserFamily::Safari, |ua, vendor| {
        ua.contains("Safari") && vendor.contains("Apple Computer")
    }),
    (BrowserFamily::InternetExplorer, |ua, _| {
        ua.contains("MSIE") || ua.contains("Trident/")
    }),
];

/// Tablet: tablet token, Android not followed by `mobi`, or touch input on
/// a wide viewport.
#[must_use]
pub fn is_tablet(user_agent: &str, has_touch: bool, viewport_width: u32) -> bool {
    TABLET_REGEX.is_match(user_agent)
        || is_android_tablet(user_agent)
        || (has_touch && viewport_width >= TABLET_MIN_TOUCH_WIDTH)
}

/// `android(?!.*mobi)` without lookahead: only a `mobi` after the Android
/// token marks a phone.
fn is_android_tablet(user_agent: &str) -> bool {
    ANDROID_REGEX
        .find(user_agent)
        .is_some_and(|m| !MOBI_REGEX.is_match(&user_agent[m.end()..]))
}

#[must_use]
pub fn is_mobile(user_agent: &str) -> bool {
    MOBILE_REGEX.is_match(user_agent)
}

/// Tablet wins over mobile; anything else is a desktop.
#[must_use]
pub fn classify_device(user_agent: &str, has_touch: bool, viewport_width: u32) -> DeviceType {
    if is_tablet(user_agent, has_touch, viewport_width) {
        DeviceType::Tablet
    } else if is_mobile(user_agent) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

#[must_use]
pub fn classify_os(user_agent: &str) -> OsFamily {
    OS_PREDICATES
        .iter()
        .find(|(_, matches)| matches(user_agent))
        .map_or(OsFamily::Unknown, |(os, _)| *os)
}

#[must_use]
pub fn classify_browser(user_agent: &str, vendor: &str) -> BrowserFamily {
    BROWSER_PREDICATES
        .iter()
        .find(|(_, matches)| matches(user_agent, vendor))
        .map_or(BrowserFamily::Unknown, |(browser, _)| *browser)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const WINDOWS_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const WINDOWS_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
    const MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    const LINUX_FIREFOX: &str =
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const LINUX_OPERA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36 OPR/105.0.0.0";
    const IE11: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko";

    const GOOGLE: &str = "Google Inc.";
    const APPLE: &str = "Apple Computer, Inc.";

    #[test]
    fn test_tablet_tokens_win_over_mobile_tokens() {
        assert_eq!(classify_device(IPAD, false, 0), DeviceType::Tablet);
        assert_eq!(classify_device(ANDROID_TABLET, false, 0), DeviceType::Tablet);
        assert_eq!(
            classify_device("Mozilla/5.0 (Linux; U; Android 2.3.4; en-us; Silk/1.1.0-80) Mobile", false, 0),
            DeviceType::Tablet
        );
    }

    #[test]
    fn test_mobile_only_tokens_are_mobile() {
        assert_eq!(classify_device(IPHONE, false, 390), DeviceType::Mobile);
        assert_eq!(classify_device(ANDROID_PHONE, true, 412), DeviceType::Mobile);
        assert_eq!(
            classify_device("BlackBerry9700/5.0.0.351 Profile/MIDP-2.1", false, 0),
            DeviceType::Mobile
        );
        assert_eq!(
            classify_device("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)", false, 0),
            DeviceType::Mobile
        );
    }

    #[test]
    fn test_lowercase_mobile_substrings_stay_desktop() {
        assert_eq!(
            classify_device("Mozilla/5.0 (X11; Linux x86_64) automobile-kiosk/1.0", false, 1920),
            DeviceType::Desktop
        );
        assert_eq!(
            classify_device("Mozilla/5.0 (X11; Linux x86_64) webos-bridge/2.0", false, 1280),
            DeviceType::Desktop
        );
        assert!(!is_mobile("automobile"));
        assert!(is_mobile("Mobile Safari"));
    }

    #[test]
    fn test_only_mobi_after_android_marks_a_phone() {
        assert_eq!(
            classify_device("Mobile Mozilla/5.0 (Linux; Android 13; SM-X700)", false, 0),
            DeviceType::Tablet
        );
        assert!(!is_android_tablet(ANDROID_PHONE));
        assert!(is_android_tablet(ANDROID_TABLET));
        assert!(!is_android_tablet(WINDOWS_CHROME));
    }

    #[test]
    fn test_touch_on_wide_viewport_is_tablet() {
        // iPadOS reports a desktop Safari UA
        assert_eq!(classify_device(MAC_SAFARI, true, 1024), DeviceType::Tablet);
        assert_eq!(classify_device(MAC_SAFARI, true, 768), DeviceType::Tablet);
        assert_eq!(classify_device(MAC_SAFARI, true, 767), DeviceType::Desktop);
        assert_eq!(classify_device(MAC_SAFARI, false, 1024), DeviceType::Desktop);
    }

    #[test]
    fn test_everything_else_is_desktop() {
        assert_eq!(classify_device(WINDOWS_CHROME, false, 1920), DeviceType::Desktop);
        assert_eq!(classify_device(LINUX_FIREFOX, false, 1280), DeviceType::Desktop);
        assert_eq!(classify_device("", false, 0), DeviceType::Desktop);
    }

    #[test]
    fn test_os_predicates_resolve_overlaps_by_order() {
        assert_eq!(classify_os(WINDOWS_CHROME), OsFamily::Windows);
        assert_eq!(classify_os(MAC_SAFARI), OsFamily::MacOS);
        assert_eq!(classify_os(LINUX_FIREFOX), OsFamily::Linux);
        assert_eq!(classify_os(ANDROID_PHONE), OsFamily::Android);
        assert_eq!(classify_os(IPHONE), OsFamily::Ios);
        assert_eq!(classify_os(IPAD), OsFamily::Ios);
        assert_eq!(classify_os("curl/8.4.0"), OsFamily::Unknown);
    }

    #[test]
    fn test_browser_predicates_use_vendor() {
        assert_eq!(classify_browser(WINDOWS_CHROME, GOOGLE), BrowserFamily::Chrome);
        assert_eq!(classify_browser(WINDOWS_EDGE, GOOGLE), BrowserFamily::Edge);
        assert_eq!(classify_browser(LINUX_OPERA, GOOGLE), BrowserFamily::Opera);
        assert_eq!(classify_browser(LINUX_FIREFOX, ""), BrowserFamily::Firefox);
        assert_eq!(classify_browser(MAC_SAFARI, APPLE), BrowserFamily::Safari);
        assert_eq!(classify_browser(IE11, ""), BrowserFamily::InternetExplorer);
    }

    #[test]
    fn test_browser_without_matching_vendor_is_unknown() {
        // Chrome token but no Google vendor (e.g. a headless embedder)
        assert_eq!(classify_browser(WINDOWS_CHROME, ""), BrowserFamily::Unknown);
        assert_eq!(classify_browser(MAC_SAFARI, ""), BrowserFamily::Unknown);
    }

    #[test]
    fn test_classification_is_idempotent() {
        for ua in [IPHONE, IPAD, ANDROID_TABLET, WINDOWS_EDGE, LINUX_FIREFOX] {
            assert_eq!(classify_device(ua, true, 800), classify_device(ua, true, 800));
            assert_eq!(classify_os(ua), classify_os(ua));
            assert_eq!(classify_browser(ua, GOOGLE), classify_browser(ua, GOOGLE));
        }
    }

    #[test]
    fn test_labels_serialize_as_display_strings() {
        assert_eq!(OsFamily::Ios.to_string(), "iOS");
        assert_eq!(BrowserFamily::InternetExplorer.to_string(), "IE");
        assert_eq!(DeviceType::Tablet.to_string(), "tablet");
        assert_eq!(OsFamily::Unknown.as_str(), "Unknown");
    }
}
