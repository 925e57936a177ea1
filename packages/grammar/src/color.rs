//! CSS colour values normalised to lowercase `#rrggbb`.

/// Colours the editor can display. Black is the default text colour and
/// is never synthesised.
pub const PALETTE: [&str; 7] = [
    "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff", "#00ffff", "#ffffff",
];

/// Parse a CSS colour into `#rrggbb`.
pub fn parse_color(value: &str) -> Option<String> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
    {
        return parse_rgb_args(args.strip_suffix(')')?);
    }

    keyword(&value).map(str::to_string)
}

/// Parse a colour and keep it only when it is in [`PALETTE`].
pub fn palette_color(value: &str) -> Option<String> {
    parse_color(value).filter(|color| PALETTE.contains(&color.as_str()))
}

fn parse_hex(hex: &str) -> Option<String> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut out = String::from("#");
            for c in hex.chars() {
                out.push(c);
                out.push(c);
            }
            Some(out)
        }
        6 => Some(format!("#{}", hex)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let mut channels = [0u8; 3];
    for (channel, part) in channels.iter_mut().zip(&parts) {
        *channel = parse_channel(part)?;
    }

    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channels[0], channels[1], channels[2]
    ))
}

fn parse_channel(part: &str) -> Option<u8> {
    if let Some(percent) = part.strip_suffix('%') {
        let percent: f64 = percent.trim().parse().ok()?;
        let scaled = (percent.clamp(0.0, 100.0) * 2.55).round();
        return Some(scaled as u8);
    }
    let value: f64 = part.parse().ok()?;
    Some(value.clamp(0.0, 255.0).round() as u8)
}

fn keyword(name: &str) -> Option<&'static str> {
    let hex = match name {
        "black" => "#000000",
        "white" => "#ffffff",
        "red" => "#ff0000",
        "lime" => "#00ff00",
        "green" => "#008000",
        "blue" => "#0000ff",
        "yellow" => "#ffff00",
        "fuchsia" | "magenta" => "#ff00ff",
        "aqua" | "cyan" => "#00ffff",
        "silver" => "#c0c0c0",
        "gray" | "grey" => "#808080",
        "maroon" => "#800000",
        "olive" => "#808000",
        "navy" => "#000080",
        "purple" => "#800080",
        "teal" => "#008080",
        "orange" => "#ffa500",
        _ => return None,
    };
    Some(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_color("#F00").as_deref(), Some("#ff0000"));
        assert_eq!(parse_color(" #00FF00 ").as_deref(), Some("#00ff00"));
        assert_eq!(parse_color("rgb(0, 0, 255)").as_deref(), Some("#0000ff"));
        assert_eq!(
            parse_color("rgba(255,255,0,0.5)").as_deref(),
            Some("#ffff00")
        );
        assert_eq!(parse_color("rgb(100%, 0%, 0%)").as_deref(), Some("#ff0000"));
        assert_eq!(parse_color("Cyan").as_deref(), Some("#00ffff"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#gggggg"), None);
        assert_eq!(parse_color("rgb(1,2)"), None);
        assert_eq!(parse_color("transparent"), None);
    }

    #[test]
    fn test_palette_excludes_black_and_off_palette() {
        assert_eq!(palette_color("red").as_deref(), Some("#ff0000"));
        assert_eq!(palette_color("black"), None);
        assert_eq!(palette_color("orange"), None);
    }
}
