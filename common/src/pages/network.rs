//! Network screen: identity, traffic and wireless link.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{Page, draw_text, or_na};
use crate::colors::{DIM, ICE, INFO_BLUE, LABEL, MINT, PERIWINKLE, SEAFOAM, SKY, VIOLET};
use crate::config::{CONTENT_LEFT, CONTENT_RIGHT, CONTENT_TOP, CONTENT_WIDTH};
use crate::history::HistoryBuffer;
use crate::metrics::{Label, LinkFaults, MetricSource, label_fmt};
use crate::rate::RateTracker;
use crate::styles::{SMALL_FONT, TINY_FONT, TOP_LEFT, TOP_RIGHT};
use crate::widgets::{SparkScale, StatusLine, draw_sparkline};

/// Shown while a rate has no baseline yet.
const NO_RATE: &str = "--";

/// Format a byte rate in KB/s.
fn kb_per_sec(rate: Option<f32>) -> Option<Label> { rate.map(|r| label_fmt(format_args!("{:.1} KB/s", r / 1024.0))) }

// =============================================================================
// Identity
// =============================================================================

/// Hostname, addresses and the connected network.
#[derive(Default)]
pub struct IdentityPage {
    hostname: Option<Label>,
    ip: Option<Label>,
    ssid: Option<Label>,
    signal: Option<Label>,
    mac: Option<Label>,
}

impl IdentityPage {
    const ROW_Y: [i32; 4] = [CONTENT_TOP + 2, CONTENT_TOP + 16, CONTENT_TOP + 30, CONTENT_TOP + 44];
    const MAC_LABEL_Y: i32 = CONTENT_TOP + 58;
    const MAC_VALUE_Y: i32 = CONTENT_TOP + 70;
}

impl Page for IdentityPage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        _now_ms: u64,
    ) {
        self.hostname = source.hostname();
        self.ip = source.ip_address();
        self.ssid = source.ssid();
        self.signal = source.signal_level();
        self.mac = source.mac_address();
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        StatusLine::new("HOST", or_na(&self.hostname))
            .with_color(SKY)
            .draw(display, Self::ROW_Y[0]);
        match &self.ip {
            Some(ip) => StatusLine::new("IP", ip.as_str()).with_color(MINT),
            None => StatusLine::new("IP", "No IP").with_color(DIM),
        }
        .draw(display, Self::ROW_Y[1]);
        StatusLine::new("SSID", or_na(&self.ssid))
            .with_color(ICE)
            .draw(display, Self::ROW_Y[2]);
        StatusLine::new("SIG", or_na(&self.signal)).draw(display, Self::ROW_Y[3]);

        // A MAC does not fit beside its label in the body font
        draw_text(display, "MAC", CONTENT_LEFT, Self::MAC_LABEL_Y, SMALL_FONT, LABEL, TOP_LEFT);
        draw_text(display, or_na(&self.mac), CONTENT_LEFT, Self::MAC_VALUE_Y, TINY_FONT, DIM, TOP_LEFT);
    }
}

// =============================================================================
// Traffic
// =============================================================================

/// Throughput, link faults and open sockets.
#[derive(Default)]
pub struct TrafficPage {
    tx: RateTracker,
    rx: RateTracker,
    tx_rate: Option<f32>,
    rx_rate: Option<f32>,
    faults: Option<LinkFaults>,
    sockets: Option<u32>,
    /// Combined tx + rx in KB/s.
    throughput: HistoryBuffer,
}

impl TrafficPage {
    const TX_Y: i32 = CONTENT_TOP;
    const RX_Y: i32 = CONTENT_TOP + 14;
    const ERRORS_Y: i32 = CONTENT_TOP + 30;
    const DROPS_Y: i32 = CONTENT_TOP + 43;
    const CONNS_Y: i32 = CONTENT_TOP + 59;
    const SPARK_Y: i32 = CONTENT_TOP + 72;
    const SPARK_HEIGHT: u32 = 22;

    fn draw_rate<D>(
        display: &mut D,
        name: &str,
        rate: Option<f32>,
        color: Rgb565,
        y: i32,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_text(display, name, CONTENT_LEFT, y, SMALL_FONT, LABEL, TOP_LEFT);
        match kb_per_sec(rate) {
            Some(value) => draw_text(display, &value, CONTENT_RIGHT, y, SMALL_FONT, color, TOP_RIGHT),
            None => draw_text(display, NO_RATE, CONTENT_RIGHT, y, SMALL_FONT, DIM, TOP_RIGHT),
        }
    }

    fn draw_count<D>(
        display: &mut D,
        name: &str,
        count: Option<u64>,
        y: i32,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let text = count.map(|n| label_fmt(format_args!("{n}")));
        let line = StatusLine::new(name, or_na(&text));
        match count {
            Some(n) => line.alert_if(n > 0),
            None => line.with_color(DIM),
        }
        .draw(display, y);
    }
}

impl Page for TrafficPage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        now_ms: u64,
    ) {
        match source.traffic() {
            Some(counters) => {
                self.tx_rate = self.tx.update(counters.tx_bytes, now_ms);
                self.rx_rate = self.rx.update(counters.rx_bytes, now_ms);
            }
            None => {
                self.tx.reset();
                self.rx.reset();
                self.tx_rate = None;
                self.rx_rate = None;
            }
        }
        let combined = self.tx_rate.zip(self.rx_rate).map(|(tx, rx)| (tx + rx) / 1024.0);
        self.throughput.push_or_gap(combined);

        self.faults = source.link_faults();
        self.sockets = source.socket_count();
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        Self::draw_rate(display, "TX", self.tx_rate, PERIWINKLE, Self::TX_Y);
        Self::draw_rate(display, "RX", self.rx_rate, SEAFOAM, Self::RX_Y);

        Self::draw_count(display, "ERRORS", self.faults.map(|f| f.errors), Self::ERRORS_Y);
        Self::draw_count(display, "DROPS", self.faults.map(|f| f.drops), Self::DROPS_Y);

        let sockets = self.sockets.map(|n| label_fmt(format_args!("{n}")));
        StatusLine::new("CONNS", or_na(&sockets))
            .with_color(INFO_BLUE)
            .draw(display, Self::CONNS_Y);

        let area = Rectangle::new(
            Point::new(CONTENT_LEFT, Self::SPARK_Y),
            Size::new(CONTENT_WIDTH, Self::SPARK_HEIGHT),
        );
        draw_sparkline(display, area, &self.throughput.snapshot(), SparkScale::Auto, VIOLET);
    }
}

// =============================================================================
// Wireless Link
// =============================================================================

/// Radio details and upstream addresses.
#[derive(Default)]
pub struct WifiPage {
    frequency: Option<Label>,
    bitrate: Option<Label>,
    quality: Option<Label>,
    gateway: Option<Label>,
    dns: Option<Label>,
}

impl WifiPage {
    const ROW_Y: [i32; 5] = [CONTENT_TOP, CONTENT_TOP + 13, CONTENT_TOP + 26, CONTENT_TOP + 42, CONTENT_TOP + 55];
}

impl Page for WifiPage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        _now_ms: u64,
    ) {
        let link = source.wifi_link();
        self.frequency = link.frequency;
        self.bitrate = link.bitrate;
        self.quality = source.link_quality();
        self.gateway = source.default_gateway();
        self.dns = source.dns_server();
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        let rows = [
            ("FREQ", &self.frequency, SKY),
            ("RATE", &self.bitrate, MINT),
            ("QUAL", &self.quality, ICE),
            ("GW", &self.gateway, PERIWINKLE),
            ("DNS", &self.dns, PERIWINKLE),
        ];
        for ((name, value, color), y) in rows.into_iter().zip(Self::ROW_Y) {
            StatusLine::new(name, or_na(value))
                .with_color(color)
                .draw(display, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{CRIT_RED, OK_GREEN};
    use crate::demo::SyntheticSource;
    use crate::framebuffer::Framebuffer;
    use crate::metrics::NullSource;

    fn count_color(
        frame: &Framebuffer,
        color: Rgb565,
    ) -> usize {
        frame.pixels().filter(|Pixel(_, c)| *c == color).count()
    }

    #[test]
    fn test_traffic_first_refresh_has_no_rate() {
        let mut source = SyntheticSource::new();
        let mut page = TrafficPage::default();
        page.refresh(&mut source, 0);
        assert_eq!(page.tx_rate, None);
        assert_eq!(page.rx_rate, None);

        source.set_clock(2_000);
        page.refresh(&mut source, 2_000);
        assert!(page.tx_rate.is_some_and(|r| r > 0.0));
        assert!(page.rx_rate.is_some_and(|r| r > 0.0));
        assert_eq!(page.throughput.real_count(), 1);
    }

    #[test]
    fn test_traffic_lost_counters_reset_baseline() {
        let mut source = SyntheticSource::new();
        let mut page = TrafficPage::default();
        page.refresh(&mut source, 0);
        page.refresh(&mut NullSource, 2_000);
        source.set_clock(4_000);
        page.refresh(&mut source, 4_000);
        assert_eq!(page.tx_rate, None);
        assert_eq!(page.throughput.len(), 3);
        assert_eq!(page.throughput.real_count(), 0);
    }

    #[test]
    fn test_fault_counts_turn_red() {
        let mut clean = Framebuffer::new();
        TrafficPage {
            faults: Some(LinkFaults { errors: 0, drops: 0 }),
            ..Default::default()
        }
        .draw(&mut clean);
        assert_eq!(count_color(&clean, CRIT_RED), 0);
        assert!(count_color(&clean, OK_GREEN) > 0);

        let mut faulty = Framebuffer::new();
        TrafficPage {
            faults: Some(LinkFaults { errors: 2, drops: 0 }),
            ..Default::default()
        }
        .draw(&mut faulty);
        assert!(count_color(&faulty, CRIT_RED) > 0);
    }

    #[test]
    fn test_identity_missing_ip() {
        let mut source = SyntheticSource::new();
        let mut page = IdentityPage::default();
        page.refresh(&mut source, 0);
        assert_eq!(page.ip.as_deref(), Some(crate::demo::DEMO_IP));

        page.refresh(&mut NullSource, 0);
        assert_eq!(page.ip, None);
        let mut frame = Framebuffer::new();
        page.draw(&mut frame);
        assert_eq!(count_color(&frame, MINT), 0);
    }

    #[test]
    fn test_wifi_rows_fill_from_source() {
        let mut page = WifiPage::default();
        page.refresh(&mut SyntheticSource::new(), 0);
        assert_eq!(page.frequency.as_deref(), Some(crate::demo::DEMO_FREQUENCY));
        assert_eq!(page.dns.as_deref(), Some(crate::demo::DEMO_DNS));
    }
}
