use std::collections::HashMap;

/// Ten-color qualitative palette.
pub const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f",
    "#edc949", "#af7aa1", "#ff9da7", "#9c755f", "#bab0ab",
];

/// Ordinal color scale: each distinct key gets the next palette color in
/// first-seen order, cycling when keys outnumber colors.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: Vec<String>,
    assigned: HashMap<String, usize>,
    order: Vec<String>,
}

impl ColorPalette {
    pub fn new(colors: &[&str]) -> Self {
        Self {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            assigned: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn tableau10() -> Self {
        Self::new(&TABLEAU10)
    }

    /// Palette with its domain fixed to `keys` (duplicates ignored).
    pub fn with_domain<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.assign(key.as_ref());
        }
        self
    }

    fn assign(&mut self, key: &str) -> usize {
        if let Some(&i) = self.assigned.get(key) {
            return i;
        }
        let i = self.order.len();
        self.assigned.insert(key.to_string(), i);
        self.order.push(key.to_string());
        i
    }

    pub fn domain(&self) -> &[String] {
        &self.order
    }

    /// Color of a key in the domain. Unknown keys fall back to the first color.
    pub fn color(&self, key: &str) -> &str {
        let i = self.assigned.get(key).copied().unwrap_or(0);
        self.colors
            .get(i % self.colors.len().max(1))
            .map(String::as_str)
            .unwrap_or("#000000")
    }
}

/// Parse `#rrggbb` or a handful of color names to RGB components.
pub fn parse_color(color: &str) -> (u8, u8, u8) {
    let hex = |s: &str| u8::from_str_radix(s, 16).ok();
    if let Some(digits) = color.strip_prefix('#') {
        if digits.len() == 6 && digits.is_ascii() {
            if let (Some(r), Some(g), Some(b)) =
                (hex(&digits[0..2]), hex(&digits[2..4]), hex(&digits[4..6]))
            {
                return (r, g, b);
            }
        }
    }
    match color {
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "gray" | "grey" => (128, 128, 128),
        _ => (0, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_assignment() {
        let palette = ColorPalette::tableau10().with_domain(["usa", "japan", "usa", "europe"]);
        assert_eq!(palette.domain(), &["usa", "japan", "europe"]);
        assert_eq!(palette.color("usa"), "#4e79a7");
        assert_eq!(palette.color("japan"), "#f28e2c");
        assert_eq!(palette.color("europe"), "#e15759");
    }

    #[test]
    fn test_palette_cycles() {
        let keys: Vec<String> = (0..12).map(|i| i.to_string()).collect();
        let palette = ColorPalette::tableau10().with_domain(&keys);
        assert_eq!(palette.color("10"), palette.color("0"));
        assert_eq!(palette.color("11"), "#f28e2c");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#4e79a7"), (0x4e, 0x79, 0xa7));
        assert_eq!(parse_color("lightgray"), (211, 211, 211));
        assert_eq!(parse_color("#zzz"), (0, 0, 0));
    }

    #[test]
    fn test_parse_color_non_ascii() {
        assert_eq!("1é234".len(), 6);
        assert_eq!(parse_color("#1é234"), (0, 0, 0));
        assert_eq!(parse_color("#ééé"), (0, 0, 0));
    }
}
