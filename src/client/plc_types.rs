use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlcTypes {
    Bool,
    USInt,
    UInt,
    Int,
    UDInt,
    DInt,
    Real,
    /// Time of day, milliseconds since midnight. Same wire layout as UDINT.
    Tod,
}

impl PlcTypes {
    pub fn size(&self) -> usize {
        match self {
            PlcTypes::Bool => 1,
            PlcTypes::USInt => 1,
            PlcTypes::UInt => 2,
            PlcTypes::Int => 2,
            PlcTypes::UDInt => 4,
            PlcTypes::DInt => 4,
            PlcTypes::Real => 4,
            PlcTypes::Tod => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlcTypes::Bool => "BOOL",
            PlcTypes::USInt => "USINT",
            PlcTypes::UInt => "UINT",
            PlcTypes::Int => "INT",
            PlcTypes::UDInt => "UDINT",
            PlcTypes::DInt => "DINT",
            PlcTypes::Real => "REAL",
            PlcTypes::Tod => "TOD",
        }
    }

    pub fn is_bool(&self) -> bool {
        *self == PlcTypes::Bool
    }
}

impl fmt::Display for PlcTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One field of a controller record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlcVariable {
    pub name: &'static str,
    pub plc_type: PlcTypes,
    /// Shown in the condensed info panel.
    pub simple: bool,
}

impl PlcVariable {
    pub const fn new(name: &'static str, plc_type: PlcTypes) -> Self {
        PlcVariable {
            name,
            plc_type,
            simple: false,
        }
    }

    pub const fn simple(name: &'static str, plc_type: PlcTypes) -> Self {
        PlcVariable {
            name,
            plc_type,
            simple: true,
        }
    }
}

/// Typed value of a slot. `NaN` is the sentinel for integer text that did not parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlcValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    NaN,
}

impl PlcValue {
    pub fn default_for(plc_type: PlcTypes) -> Self {
        match plc_type {
            PlcTypes::Bool => PlcValue::Bool(false),
            PlcTypes::Real => PlcValue::Real(0.0),
            _ => PlcValue::Int(0),
        }
    }

    /// Parse display or override text into the native value of `plc_type`.
    pub fn from_text(plc_type: PlcTypes, text: &str) -> Self {
        match plc_type {
            PlcTypes::Bool => PlcValue::Bool(text == "true" || text == "True"),
            PlcTypes::Real => PlcValue::Real(parse_real_prefix(text).unwrap_or(f64::NAN)),
            _ => match parse_int_prefix(text) {
                Some(v) => PlcValue::Int(v),
                None => PlcValue::NaN,
            },
        }
    }

    pub fn is_true(&self) -> bool {
        match *self {
            PlcValue::Bool(b) => b,
            PlcValue::Int(v) => v != 0,
            PlcValue::Real(v) => v != 0.0 && !v.is_nan(),
            PlcValue::NaN => false,
        }
    }

    // Truncates toward zero; NaN and infinities become 0.
    fn as_i64(&self) -> i64 {
        match *self {
            PlcValue::Bool(b) => b as i64,
            PlcValue::Int(v) => v,
            PlcValue::Real(v) if v.is_finite() => v.trunc() as i64,
            PlcValue::Real(_) | PlcValue::NaN => 0,
        }
    }

    fn as_f64(&self) -> f64 {
        match *self {
            PlcValue::Bool(b) => b as i64 as f64,
            PlcValue::Int(v) => v as f64,
            PlcValue::Real(v) => v,
            PlcValue::NaN => f64::NAN,
        }
    }
}

impl fmt::Display for PlcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PlcValue::Bool(b) => write!(f, "{}", b),
            PlcValue::Int(v) => write!(f, "{}", v),
            PlcValue::Real(v) if v.is_nan() => f.write_str("NaN"),
            PlcValue::Real(v) if v.is_infinite() => {
                f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            PlcValue::Real(v) => write!(f, "{}", v),
            PlcValue::NaN => f.write_str("NaN"),
        }
    }
}

/// Value slot of one field inside a bound record.
#[derive(Debug, Clone, PartialEq)]
pub struct PlcValueSlot {
    pub variable: PlcVariable,
    pub bytes: Vec<u8>,
    pub value: PlcValue,
}

impl PlcValueSlot {
    pub fn new(variable: PlcVariable) -> Self {
        PlcValueSlot {
            variable,
            bytes: Vec::new(),
            value: PlcValue::default_for(variable.plc_type),
        }
    }

    pub fn name(&self) -> &'static str {
        self.variable.name
    }

    pub fn plc_type(&self) -> PlcTypes {
        self.variable.plc_type
    }

    pub fn value_from_text(&mut self, text: &str) {
        self.value = PlcValue::from_text(self.plc_type(), text);
    }

    pub fn value_to_text(&self) -> String {
        self.value.to_string()
    }

    /// Little-endian, fixed width. Integers wrap to the field width.
    pub fn value_to_bytes(&mut self) {
        let v = self.value;
        self.bytes = match self.plc_type() {
            PlcTypes::Bool => vec![v.is_true() as u8],
            PlcTypes::USInt => vec![v.as_i64() as u8],
            PlcTypes::UInt => (v.as_i64() as u16).to_le_bytes().to_vec(),
            PlcTypes::Int => (v.as_i64() as i16).to_le_bytes().to_vec(),
            PlcTypes::UDInt | PlcTypes::Tod => (v.as_i64() as u32).to_le_bytes().to_vec(),
            PlcTypes::DInt => (v.as_i64() as i32).to_le_bytes().to_vec(),
            PlcTypes::Real => (v.as_f64() as f32).to_le_bytes().to_vec(),
        };
    }

    pub fn bytes_to_value(&mut self) -> io::Result<()> {
        let mut rdr = self.bytes.as_slice();
        self.value = match self.plc_type() {
            PlcTypes::Bool => PlcValue::Bool(rdr.read_u8()? > 0),
            PlcTypes::USInt => PlcValue::Int(rdr.read_u8()? as i64),
            PlcTypes::UInt => PlcValue::Int(rdr.read_u16::<LittleEndian>()? as i64),
            PlcTypes::Int => PlcValue::Int(rdr.read_i16::<LittleEndian>()? as i64),
            PlcTypes::UDInt | PlcTypes::Tod => {
                PlcValue::Int(rdr.read_u32::<LittleEndian>()? as i64)
            }
            PlcTypes::DInt => PlcValue::Int(rdr.read_i32::<LittleEndian>()? as i64),
            PlcTypes::Real => {
                PlcValue::Real(round_millis(rdr.read_f32::<LittleEndian>()? as f64))
            }
        };
        Ok(())
    }
}

/// Rounds to three decimals, halves toward +inf.
pub fn round_millis(value: f64) -> f64 {
    (value * 1000.0 + 0.5).floor() / 1000.0
}

/// Integer prefix of `text`: optional sign, `0x` for hex, then leading digits.
/// The rest is ignored. Digit runs beyond the i64 range saturate.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let mut value: Option<i64> = None;
    for c in digits.chars() {
        let digit = match c.to_digit(radix) {
            Some(d) => d as i64,
            None => break,
        };
        let shifted = value.unwrap_or(0).saturating_mul(radix as i64);
        value = Some(if negative {
            shifted.saturating_sub(digit)
        } else {
            shifted.saturating_add(digit)
        });
    }
    value
}

/// Longest float prefix of `text`: sign, digits, fraction and exponent, or
/// `Infinity`. Leading whitespace is skipped.
pub fn parse_real_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_from = |from: usize| {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    if trimmed[end..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = digits_from(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if let Some(b'e') | Some(b'E') = bytes.get(end) {
        let mut exponent = end + 1;
        if let Some(b'+') | Some(b'-') = bytes.get(exponent) {
            exponent += 1;
        }
        let exp_digits = digits_from(exponent);
        if exp_digits > 0 {
            end = exponent + exp_digits;
        }
    }
    trimmed[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(plc_type: PlcTypes) -> PlcValueSlot {
        PlcValueSlot::new(PlcVariable::new("Field", plc_type))
    }

    #[test]
    fn plc_type_size_test() {
        assert_eq!(PlcTypes::Bool.size(), 1);
        assert_eq!(PlcTypes::USInt.size(), 1);
        assert_eq!(PlcTypes::UInt.size(), 2);
        assert_eq!(PlcTypes::Int.size(), 2);
        assert_eq!(PlcTypes::UDInt.size(), 4);
        assert_eq!(PlcTypes::DInt.size(), 4);
        assert_eq!(PlcTypes::Real.size(), 4);
        assert_eq!(PlcTypes::Tod.size(), 4);
        assert_eq!(PlcTypes::Tod.to_string(), "TOD");
    }

    #[test]
    fn bool_from_text_test() {
        assert_eq!(PlcValue::from_text(PlcTypes::Bool, "true"), PlcValue::Bool(true));
        assert_eq!(PlcValue::from_text(PlcTypes::Bool, "True"), PlcValue::Bool(true));
        assert_eq!(PlcValue::from_text(PlcTypes::Bool, "TRUE"), PlcValue::Bool(false));
        assert_eq!(PlcValue::from_text(PlcTypes::Bool, "1"), PlcValue::Bool(false));
        assert_eq!(PlcValue::from_text(PlcTypes::Bool, ""), PlcValue::Bool(false));
    }

    #[test]
    fn int_from_text_test() {
        assert_eq!(PlcValue::from_text(PlcTypes::UInt, "42"), PlcValue::Int(42));
        assert_eq!(PlcValue::from_text(PlcTypes::DInt, "-17.9"), PlcValue::Int(-17));
        assert_eq!(PlcValue::from_text(PlcTypes::UDInt, "  12abc"), PlcValue::Int(12));
        assert_eq!(PlcValue::from_text(PlcTypes::Int, "abc"), PlcValue::NaN);
        assert_eq!(PlcValue::from_text(PlcTypes::Tod, ""), PlcValue::NaN);
        assert_eq!(PlcValue::NaN.to_string(), "NaN");
    }

    #[test]
    fn int_prefix_test() {
        assert_eq!(parse_int_prefix("0x1F"), Some(31));
        assert_eq!(parse_int_prefix("-0Xff;"), Some(-255));
        assert_eq!(parse_int_prefix("0x"), None);
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_int_prefix("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int_prefix("-99999999999999999999x"), Some(i64::MIN));
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn real_prefix_test() {
        assert_eq!(parse_real_prefix(" -.5"), Some(-0.5));
        assert_eq!(parse_real_prefix("12.5.3"), Some(12.5));
        assert_eq!(parse_real_prefix("1e3kg"), Some(1000.0));
        assert_eq!(parse_real_prefix("2E-2"), Some(0.02));
        assert_eq!(parse_real_prefix("4e"), Some(4.0));
        assert_eq!(parse_real_prefix("7."), Some(7.0));
        assert_eq!(parse_real_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_real_prefix("-Infinityx"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_real_prefix("information"), None);
        assert_eq!(parse_real_prefix("inf"), None);
        assert_eq!(parse_real_prefix("NaN"), None);
        assert_eq!(parse_real_prefix("."), None);
        assert_eq!(parse_real_prefix(&"9".repeat(10_000)), Some(f64::INFINITY));
    }

    #[test]
    fn real_from_text_test() {
        assert_eq!(PlcValue::from_text(PlcTypes::Real, "12.5"), PlcValue::Real(12.5));
        assert_eq!(PlcValue::from_text(PlcTypes::Real, "3.25kg"), PlcValue::Real(3.25));
        match PlcValue::from_text(PlcTypes::Real, "x") {
            PlcValue::Real(v) => assert!(v.is_nan()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn value_to_bytes_little_endian_test() {
        let mut s = slot(PlcTypes::UInt);
        s.value = PlcValue::Int(0x1234);
        s.value_to_bytes();
        assert_eq!(s.bytes, vec![0x34, 0x12]);

        let mut s = slot(PlcTypes::DInt);
        s.value = PlcValue::Int(-2);
        s.value_to_bytes();
        assert_eq!(s.bytes, vec![0xFE, 0xFF, 0xFF, 0xFF]);

        let mut s = slot(PlcTypes::Tod);
        s.value = PlcValue::Int(12000);
        s.value_to_bytes();
        assert_eq!(s.bytes, vec![224, 46, 0, 0]);

        let mut s = slot(PlcTypes::Real);
        s.value = PlcValue::Real(12000.33);
        s.value_to_bytes();
        assert_eq!(s.bytes, vec![82, 129, 59, 70]);

        let mut s = slot(PlcTypes::Bool);
        s.value = PlcValue::Bool(true);
        s.value_to_bytes();
        assert_eq!(s.bytes, vec![1]);
    }

    #[test]
    fn value_to_bytes_wraps_and_zeroes_test() {
        let mut s = slot(PlcTypes::USInt);
        s.value = PlcValue::Int(300);
        s.value_to_bytes();
        assert_eq!(s.bytes, vec![44]);

        let mut s = slot(PlcTypes::UInt);
        s.value = PlcValue::NaN;
        s.value_to_bytes();
        assert_eq!(s.bytes, vec![0, 0]);
    }

    #[test]
    fn bytes_to_value_test() {
        let mut s = slot(PlcTypes::Int);
        s.bytes = vec![0xFF, 0xFF];
        s.bytes_to_value().unwrap();
        assert_eq!(s.value, PlcValue::Int(-1));

        let mut s = slot(PlcTypes::UDInt);
        s.bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        s.bytes_to_value().unwrap();
        assert_eq!(s.value, PlcValue::Int(4294967295));

        let mut s = slot(PlcTypes::Bool);
        s.bytes = vec![4];
        s.bytes_to_value().unwrap();
        assert_eq!(s.value, PlcValue::Bool(true));
    }

    #[test]
    fn real_rounding_test() {
        let mut s = slot(PlcTypes::Real);
        s.bytes = 1.1f32.to_le_bytes().to_vec();
        s.bytes_to_value().unwrap();
        assert_eq!(s.value, PlcValue::Real(1.1));

        s.bytes = 12000.33f32.to_le_bytes().to_vec();
        s.bytes_to_value().unwrap();
        assert_eq!(s.value, PlcValue::Real(12000.33));

        assert_eq!(round_millis(0.0625), 0.063);
        assert_eq!(round_millis(-0.0625), -0.062);
    }

    #[test]
    fn bytes_to_value_short_buffer_test() {
        let mut s = slot(PlcTypes::UDInt);
        s.bytes = vec![1, 2];
        assert!(s.bytes_to_value().is_err());
        assert_eq!(s.value, PlcValue::Int(0));
    }

    #[test]
    fn value_display_test() {
        assert_eq!(PlcValue::Bool(true).to_string(), "true");
        assert_eq!(PlcValue::Int(-5).to_string(), "-5");
        assert_eq!(PlcValue::Real(2.0).to_string(), "2");
        assert_eq!(PlcValue::Real(0.125).to_string(), "0.125");
    }
}
