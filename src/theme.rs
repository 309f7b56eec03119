use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_weight: u16,
    pub background: String,
    pub vignette_inner: String,
    pub vignette_outer: String,
    pub shell_highlight: String,
    pub shell_mid: String,
    pub shell_edge: String,
    pub shell_stroke: String,
    pub guide_color: String,
    pub guide_opacity: f64,
    /// Label color for the lightest keyword.
    pub label_low_color: String,
    /// Label color for the heaviest keyword.
    pub label_high_color: String,
    pub placeholder_color: String,
    pub tooltip_background: String,
    pub tooltip_text_color: String,
}

impl Theme {
    pub fn midnight() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_weight: 600,
            background: "#070A12".to_string(),
            vignette_inner: "#111A2E".to_string(),
            vignette_outer: "#04060B".to_string(),
            shell_highlight: "#2A3B63".to_string(),
            shell_mid: "#152038".to_string(),
            shell_edge: "#0A0F1C".to_string(),
            shell_stroke: "#3A4E7A".to_string(),
            guide_color: "#7C93C9".to_string(),
            guide_opacity: 0.14,
            label_low_color: "#7FA7FF".to_string(),
            label_high_color: "#FFD27A".to_string(),
            placeholder_color: "#9AA7C2".to_string(),
            tooltip_background: "#0E1526".to_string(),
            tooltip_text_color: "#F2F5FC".to_string(),
        }
    }

    pub fn daylight() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_weight: 600,
            background: "#F6F8FC".to_string(),
            vignette_inner: "#FFFFFF".to_string(),
            vignette_outer: "#E3E8F2".to_string(),
            shell_highlight: "#FFFFFF".to_string(),
            shell_mid: "#EAF0FA".to_string(),
            shell_edge: "#C9D4E8".to_string(),
            shell_stroke: "#AFBDD8".to_string(),
            guide_color: "#5A6C92".to_string(),
            guide_opacity: 0.16,
            label_low_color: "#5B7DB8".to_string(),
            label_high_color: "#C2410C".to_string(),
            placeholder_color: "#5A6781".to_string(),
            tooltip_background: "#1C2430".to_string(),
            tooltip_text_color: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "midnight" | "dark" | "default" => Some(Self::midnight()),
            "daylight" | "light" => Some(Self::daylight()),
            _ => None,
        }
    }

    /// Label color for a normalized weight: a straight RGB blend of the two stops.
    pub fn label_color(&self, normalized: f64) -> Rgb {
        let low = Rgb::parse(&self.label_low_color).unwrap_or(Rgb::WHITE);
        let high = Rgb::parse(&self.label_high_color).unwrap_or(Rgb::WHITE);
        low.lerp(high, normalized)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::midnight()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB`.
    pub fn parse(input: &str) -> Option<Self> {
        let hex = input.trim().strip_prefix('#')?;
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16));
                let r = digits.next()??;
                let g = digits.next()??;
                let b = digits.next()??;
                Some(Self::new((r * 17) as u8, (g * 17) as u8, (b * 17) as u8))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| -> u8 {
            let a = a as f64;
            let b = b as f64;
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
