use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{EdfError, Result};
use crate::types::{Coercion, FieldSpec, FieldValue};

/// Fixed-width field codec: slice `spec.width` bytes at `offset` and coerce.
///
/// Slices that run past the end of `bytes` are clipped; a slice that starts
/// past the end is empty, which coerces to `""` or NaN.
pub fn read_field(bytes: &[u8], offset: usize, spec: &FieldSpec) -> FieldValue {
    let raw = slice_ascii(bytes, offset, spec.width);
    match spec.coercion {
        Coercion::Raw => FieldValue::Text(raw),
        Coercion::Text => FieldValue::Text(raw.trim().to_string()),
        Coercion::Number => FieldValue::Number(atof_or_nan(&raw)),
    }
}

/// 按字节截取字段，越界部分截断
pub fn slice_ascii(bytes: &[u8], offset: usize, width: usize) -> String {
    let start = offset.min(bytes.len());
    let end = offset.saturating_add(width).min(bytes.len());
    String::from_utf8_lossy(&bytes[start..end]).into_owned()
}

/// 非本地化的整数解析（避免受系统locale影响）
pub fn atoi_nonlocalized(s: &str) -> i32 {
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }

    s.parse().unwrap_or(0)
}

/// 非本地化的浮点数解析，无法解析时返回NaN
pub fn atof_or_nan(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return f64::NAN;
    }

    s.parse().unwrap_or(f64::NAN)
}

/// 解析EDF时间字符串为100纳秒单位
///
/// Accepts an optional single sign followed by ASCII digits with an optional
/// fraction. Digits past the seventh decimal place are dropped.
///
/// # Errors
///
/// * `EdfError::InvalidFormat` - empty, non-numeric, or out of `i64` range
pub fn parse_edf_time(s: &str) -> Result<i64> {
    let s = s.trim();

    if s.is_empty() {
        return Err(EdfError::InvalidFormat("Empty time string".to_string()));
    }

    // 处理符号，只允许一个
    let (negative, body) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };

    let (integer_part, decimal_part) = match body.find('.') {
        Some(dot_pos) => (&body[..dot_pos], &body[dot_pos + 1..]),
        None => (body, ""),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (integer_part.is_empty() && decimal_part.is_empty())
        || !all_digits(integer_part)
        || !all_digits(decimal_part)
    {
        return Err(EdfError::InvalidFormat(format!("Invalid time: {}", s)));
    }

    let out_of_range = || EdfError::InvalidFormat(format!("Time out of range: {}", s));

    let mut value = 0i64;
    if !integer_part.is_empty() {
        value = integer_part
            .parse::<i64>()
            .map_err(|_| out_of_range())?
            .checked_mul(crate::EDFLIB_TIME_DIMENSION)
            .ok_or_else(out_of_range)?;
    }

    // 小数部分最多7位精度，已确认全为ASCII数字
    if !decimal_part.is_empty() {
        let decimal_str = &decimal_part[..decimal_part.len().min(7)];
        let decimal_value = decimal_str.parse::<i64>().map_err(|_| out_of_range())?;
        let scale = 10i64.pow(7 - decimal_str.len() as u32);
        value = value
            .checked_add(decimal_value * scale)
            .ok_or_else(out_of_range)?;
    }

    Ok(if negative { -value } else { value })
}

/// Combines the header's `dd.mm.yy` date and `hh.mm.ss` time fields.
///
/// Two-digit years use the EDF clipping convention: 85-99 is 19xx, the rest 20xx.
pub fn parse_start_datetime(date_str: &str, time_str: &str) -> Option<NaiveDateTime> {
    let date_parts: Vec<&str> = date_str.trim().split('.').collect();
    if date_parts.len() != 3 || !date_parts.iter().all(|p| is_digits(p)) {
        return None;
    }

    let day = atoi_nonlocalized(date_parts[0]);
    let month = atoi_nonlocalized(date_parts[1]);
    let year = {
        let yy = atoi_nonlocalized(date_parts[2]);
        if yy > 84 { 1900 + yy } else { 2000 + yy }
    };
    let start_date = NaiveDate::from_ymd_opt(year, month as u32, day as u32)?;

    let time_parts: Vec<&str> = time_str.trim().split('.').collect();
    if time_parts.len() != 3 || !time_parts.iter().all(|p| is_digits(p)) {
        return None;
    }

    let hour = atoi_nonlocalized(time_parts[0]);
    let minute = atoi_nonlocalized(time_parts[1]);
    let second = atoi_nonlocalized(time_parts[2]);
    let start_time = NaiveTime::from_hms_opt(hour as u32, minute as u32, second as u32)?;

    Some(NaiveDateTime::new(start_date, start_time))
}

fn is_digits(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
