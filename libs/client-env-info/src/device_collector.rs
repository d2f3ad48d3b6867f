use std::sync::Arc;

use crate::classify::{classify_browser, classify_device, classify_os};
use crate::host::HostEnvironment;
use crate::model::{DeviceInfo, Probed, ScreenInfo, TouchSupport, ViewportInfo};

const DNT_UNSPECIFIED: &str = "unspecified";

/// Collects the base environment record from the host's synchronous reads
pub struct DeviceInfoCollector {
    host: Arc<dyn HostEnvironment>,
}

impl DeviceInfoCollector {
    #[must_use]
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        Self { host }
    }

    /// Collect the base record. Never fails: every field is a direct read
    /// or a classification over one.
    #[must_use]
    pub fn collect(&self) -> DeviceInfo {
        let navigator = self.host.navigator();
        let screen = self.host.screen();
        let viewport = self.host.viewport();

        let touch_support = TouchSupport {
            has_touch: viewport.touch_events || navigator.max_touch_points > 0,
            max_touch_points: navigator.max_touch_points,
        };

        let device_type = classify_device(
            &navigator.user_agent,
            touch_support.has_touch,
            viewport.inner_width,
        );
        let os = classify_os(&navigator.user_agent);
        let browser = classify_browser(&navigator.user_agent, &navigator.vendor);

        tracing::debug!(
            device_type = %device_type,
            os = %os,
            browser = %browser,
            "Classified client environment"
        );

        DeviceInfo {
            user_agent: navigator.user_agent,
            platform: navigator.platform,
            vendor: navigator.vendor,
            language: navigator.language,
            languages: navigator.languages,
            cookie_enabled: navigator.cookie_enabled,
            online: navigator.on_line,
            do_not_track: navigator
                .do_not_track
                .unwrap_or_else(|| DNT_UNSPECIFIED.to_owned()),
            timezone: Probed::from_option(self.host.timezone()),
            device_type,
            os,
            browser,
            screen: ScreenInfo {
                width: screen.width,
                height: screen.height,
                avail_width: screen.avail_width,
                avail_height: screen.avail_height,
                color_depth: screen.color_depth,
                pixel_depth: screen.pixel_depth,
                orientation: screen
                    .orientation
                    .map_or(Probed::NotSupported, Probed::Value),
            },
            viewport: ViewportInfo {
                width: viewport.inner_width,
                height: viewport.inner_height,
                device_pixel_ratio: viewport.device_pixel_ratio,
            },
            touch_support,
        }
    }
}
