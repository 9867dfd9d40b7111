use crate::models::{BadgeStats, LanguageTotal};

pub const WIDTH: u32 = 900;
pub const HEIGHT: u32 = 320;
pub const BAR_WIDTH: u32 = 600;
pub const MIN_SEGMENT_WIDTH: i64 = 2;
/// Dash pattern length of the current-streak ring
pub const RING_LENGTH: f64 = 214.0;

pub const PALETTE: [&str; 6] = ["#ef476f", "#ff7b25", "#5aa3ff", "#ff6b6b", "#ffd166", "#7fdbb7"];

/// One slice of the stacked language bar
#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub x: i64,
    pub width: i64,
    pub color: &'static str,
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Lay out the stacked bar left to right, each segment at least 2 px wide
pub fn bar_segments(languages: &[LanguageTotal]) -> Vec<BarSegment> {
    let mut x = 0;
    languages
        .iter()
        .enumerate()
        .map(|(i, lang)| {
            let width = MIN_SEGMENT_WIDTH
                .max((lang.percentage / 100.0 * f64::from(BAR_WIDTH)).round() as i64);
            let segment = BarSegment { x, width, color: palette_color(i) };
            x += width;
            segment
        })
        .collect()
}

/// Dash length of the current-streak ring, relative to the longest streak
pub fn ring_dash(current: usize, longest: usize) -> i64 {
    let denominator = current.max(longest).max(1) as f64;
    (RING_LENGTH.min(current as f64 / denominator * RING_LENGTH)).round() as i64
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the badge. Pure: the same stats always give the same markup.
pub fn render_svg(stats: &BadgeStats) -> String {
    let streaks = &stats.streaks;
    let current = streaks.current_streak;
    let longest = streaks.longest_streak;

    let date_range = match (streaks.longest_streak_start, streaks.longest_streak_end) {
        (Some(start), Some(end)) => format!("{} - {}", start, end),
        _ => String::new(),
    };
    let active = if current > 0 { "Active" } else { "" };

    let mut svg = format!(
        r##"<?xml version="1.0" encoding="utf-8"?>
<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" style="background:#0b1117">
  <style>
    .title {{ fill:#ffffff; font-family: Inter, Arial, sans-serif; font-size:20px; font-weight:700; }}
    .label {{ fill:#9aa9b2; font-family: Inter, Arial, sans-serif; font-size:13px; }}
    .value {{ fill:#e7c36e; font-family: Inter, Arial, sans-serif; font-size:36px; font-weight:700; }}
    .small {{ fill:#d6b3a5; font-family: Inter, Arial, sans-serif; font-size:12px; }}
    .card {{ fill: none; stroke: rgba(255,255,255,0.08); stroke-width:1.2; rx:8; }}
    .divider {{ stroke: rgba(255,255,255,0.06); stroke-width:1; }}
  </style>

  <text x="18" y="28" class="title">GitHub Stats:</text>

  <g transform="translate(18,40)">
    <rect x="0" y="0" width="860" height="120" rx="6" class="card" />

    <g transform="translate(30,18)">
      <text x="0" y="36" class="value">{total}</text>
      <text x="0" y="60" class="label">Total Contributions</text>
      <text x="0" y="82" class="small">All-time (contributions calendar)</text>
    </g>

    <g transform="translate(320,12)">
      <line x1="-30" y1="6" x2="-30" y2="100" class="divider"/>
      <g transform="translate(50,10)">
        <circle cx="50" cy="44" r="44" fill="none" stroke="#E7C36E" stroke-width="6" opacity="0.12"/>
        <circle cx="50" cy="44" r="44" fill="none" stroke="#E7C36E" stroke-width="6"
          stroke-dasharray="{dash} {ring}" stroke-linecap="round"/>
        <text x="50" y="52" text-anchor="middle" class="value" style="font-size:30px">{current}</text>
        <text x="50" y="74" text-anchor="middle" class="label">Current Streak</text>
        <text x="50" y="92" text-anchor="middle" class="small">{active}</text>
      </g>
    </g>

    <g transform="translate(600,14)">
      <line x1="-30" y1="6" x2="-30" y2="100" class="divider"/>
      <text x="40" y="36" class="value">{longest}</text>
      <text x="40" y="60" class="label">Longest Streak</text>
      <text x="40" y="82" class="small">{date_range}</text>
    </g>
  </g>
"##,
        w = WIDTH,
        h = HEIGHT,
        total = stats.total_contributions,
        dash = ring_dash(current, longest),
        ring = RING_LENGTH,
        current = current,
        active = active,
        longest = longest,
        date_range = date_range,
    );

    svg.push_str(&format!(
        r##"
  <g transform="translate(18,180)">
    <rect x="0" y="0" width="420" height="110" rx="6" class="card" />
    <text x="16" y="28" class="label" style="fill:#e6c07b; font-weight:700">Most Used Languages</text>

    <g transform="translate(16,44)">
      <rect x="0" y="0" width="{bar}" height="12" rx="6" fill="#0f1720" />"##,
        bar = BAR_WIDTH,
    ));

    for segment in bar_segments(&stats.top_languages) {
        svg.push_str(&format!(
            r#"
      <rect x="{}" y="0" width="{}" height="12" rx="6" fill="{}" />"#,
            segment.x, segment.width, segment.color
        ));
    }

    svg.push_str(
        r#"
    </g>

    <g transform="translate(16,64)">"#,
    );

    for (i, lang) in stats.top_languages.iter().enumerate() {
        let x = if i < 3 { 0 } else { 220 };
        let y = (i % 3) * 20;
        svg.push_str(&format!(
            r#"
      <g transform="translate({x},{y})">
        <rect x="0" y="0" width="10" height="10" rx="2" fill="{color}"></rect>
        <text x="16" y="10" class="small">{name} {pct}%</text>
      </g>"#,
            x = x,
            y = y,
            color = palette_color(i),
            name = escape_xml(&lang.language),
            pct = lang.percentage,
        ));
    }

    svg.push_str(
        r#"
    </g>
  </g>
</svg>"#,
    );

    svg
}
