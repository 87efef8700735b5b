//! Tolerant free-text hardware spec parsing
//!
//! Extracts a best-effort numeric magnitude and unit from strings like
//! "Intel i7 4.2GHz, 8 cores", "16GB DDR4" or "2TB NVMe". Unparseable
//! text yields `None` for that field; it is never an error.

/// Recognized unit suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecUnit {
    Gigahertz,
    Megabytes,
    Gigabytes,
    Terabytes,
    Cores,
}

/// A parsed hardware spec: magnitude plus the unit that followed it,
/// if one was recognized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedSpec {
    pub magnitude: f64,
    pub unit: Option<SpecUnit>,
}

impl ParsedSpec {
    /// Interpret the spec as a CPU core count.
    ///
    /// Bare numbers ("8") and core-suffixed numbers ("8 cores") count;
    /// a clock speed says nothing about machine size.
    pub fn as_cores(&self) -> Option<f64> {
        match self.unit {
            Some(SpecUnit::Cores) | None => Some(self.magnitude),
            Some(SpecUnit::Gigahertz) => None,
            Some(_) => None,
        }
    }

    /// Interpret the spec as a capacity in gigabytes.
    /// Bare numbers are assumed to already be in GB.
    pub fn as_gigabytes(&self) -> Option<f64> {
        match self.unit {
            Some(SpecUnit::Gigabytes) | None => Some(self.magnitude),
            Some(SpecUnit::Terabytes) => Some(self.magnitude * 1024.0),
            Some(SpecUnit::Megabytes) => Some(self.magnitude / 1024.0),
            Some(SpecUnit::Gigahertz) | Some(SpecUnit::Cores) => None,
        }
    }
}

/// Parse the first usable numeric token out of free-form spec text.
///
/// Prefers the first number that carries a recognized unit suffix; falls
/// back to the first bare number. A digit glued to a preceding letter
/// (the 7 in "i7") does not start a numeric token.
pub fn parse_spec(text: &str) -> Option<ParsedSpec> {
    let bytes = text.as_bytes();
    let mut first_bare: Option<f64> = None;
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() || preceded_by_alphanumeric(bytes, i) {
            i += 1;
            continue;
        }

        let start = i;
        let mut seen_dot = false;
        while i < bytes.len()
            && (bytes[i].is_ascii_digit() || (bytes[i] == b'.' && !seen_dot))
        {
            if bytes[i] == b'.' {
                seen_dot = true;
            }
            i += 1;
        }

        let token = &text[start..i];
        let magnitude = match token.trim_end_matches('.').parse::<f64>() {
            Ok(m) => m,
            Err(_) => continue,
        };

        if let Some(unit) = unit_after(text, i) {
            return Some(ParsedSpec {
                magnitude,
                unit: Some(unit),
            });
        }
        if first_bare.is_none() {
            first_bare = Some(magnitude);
        }
    }

    first_bare.map(|magnitude| ParsedSpec {
        magnitude,
        unit: None,
    })
}

fn preceded_by_alphanumeric(bytes: &[u8], idx: usize) -> bool {
    idx > 0 && (bytes[idx - 1].is_ascii_alphanumeric() || bytes[idx - 1] == b'.')
}

/// Read the alphabetic token following a number (skipping spaces) and
/// map it to a known unit.
fn unit_after(text: &str, from: usize) -> Option<SpecUnit> {
    let rest = text[from..].trim_start();
    let word: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    match word.to_ascii_lowercase().as_str() {
        "ghz" => Some(SpecUnit::Gigahertz),
        "mb" | "mib" => Some(SpecUnit::Megabytes),
        "gb" | "gib" => Some(SpecUnit::Gigabytes),
        "tb" | "tib" => Some(SpecUnit::Terabytes),
        "core" | "cores" | "cpu" | "cpus" | "vcpu" | "vcpus" => Some(SpecUnit::Cores),
        _ => None,
    }
}
