use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Portuguese month names used for the statement column headers.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Converts an Excel 1900-system serial number to a calendar date.
/// Uses the 1899-12-30 epoch, which lands modern dates correctly despite the
/// 1900 leap-year quirk; fractional time-of-day parts are discarded.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Best-effort date parse over the formats seen in the source exports.
/// Returns `None` for anything unparseable; never errors.
pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }

    None
}

/// Best-effort decimal parse. Accepts plain numbers and Brazilian formatting
/// ("R$ 1.234,56"); returns `None` for anything unparseable.
pub fn parse_amount_str(raw: &str) -> Option<Decimal> {
    let mut value = raw.trim().replace("R$", "").replace(' ', "");
    if value.is_empty() {
        return None;
    }
    // A comma marks Brazilian decimal notation: dots are thousands separators.
    if value.contains(',') {
        value = value.replace('.', "").replace(',', ".");
    }
    value.parse::<Decimal>().ok()
}
