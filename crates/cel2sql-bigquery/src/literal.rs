//! Literal formatting
//!
//! Maps a constant and its static type to BigQuery literal syntax. A value
//! whose kind disagrees with the static type is rejected rather than
//! coerced: it means the checker and the schema disagree, and guessing would
//! produce SQL with different semantics.

use crate::dialect::{quote_bytes, quote_string};
use crate::duration::interval_from_delta;
use cel2sql_ast::{Literal, Type};
use cel2sql_diagnostics::ConvertError;
use chrono::Timelike;

/// Format `value` as a BigQuery literal of static type `ty`
pub fn format_literal(value: &Literal, ty: &Type) -> Result<String, ConvertError> {
    let sql = match (value, ty) {
        (Literal::Null, _) => "NULL".to_string(),
        (Literal::Bool(b), Type::Bool) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        (Literal::Int(i), Type::Int) => i.to_string(),
        (Literal::Uint(u), Type::Uint) => {
            if i64::try_from(*u).is_err() {
                return Err(ConvertError::out_of_range(
                    ty,
                    format!("{} exceeds the INT64 range", u),
                ));
            }
            u.to_string()
        }
        (Literal::Double(d), Type::Double) => format_double(*d),
        (Literal::String(s), Type::String) => quote_string(s),
        (Literal::Bytes(b), Type::Bytes) => quote_bytes(b),
        (Literal::Timestamp(ts), Type::Timestamp) => {
            whole_micros(ts.nanosecond(), ty)?;
            format!("TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.f+00"))
        }
        (Literal::Date(d), Type::Date) => format!("DATE '{}'", d.format("%Y-%m-%d")),
        (Literal::Time(t), Type::Time) => {
            whole_micros(t.nanosecond(), ty)?;
            format!("TIME '{}'", t.format("%H:%M:%S%.f"))
        }
        (Literal::DateTime(dt), Type::DateTime) => {
            whole_micros(dt.nanosecond(), ty)?;
            format!("DATETIME '{}'", dt.format("%Y-%m-%d %H:%M:%S%.f"))
        }
        (Literal::Duration(d), Type::Duration) => interval_from_delta(*d)?.to_string(),
        (value, ty) => {
            return Err(ConvertError::render(
                ty,
                format!("no literal syntax for a {} value of this type", value.kind()),
            ));
        }
    };
    Ok(sql)
}

/// BigQuery temporal literals carry at most microsecond precision
fn whole_micros(nanos: u32, ty: &Type) -> Result<(), ConvertError> {
    if nanos % 1_000 != 0 {
        return Err(ConvertError::render(
            ty,
            format!("fraction .{:09} is finer than microseconds", nanos % 1_000_000_000),
        ));
    }
    Ok(())
}

/// Format a double so it never reads back as an integer
fn format_double(d: f64) -> String {
    if d.is_nan() {
        "CAST('NaN' AS FLOAT64)".to_string()
    } else if d.is_infinite() {
        if d > 0.0 {
            "CAST('inf' AS FLOAT64)".to_string()
        } else {
            "CAST('-inf' AS FLOAT64)".to_string()
        }
    } else {
        // Debug keeps a '.' or an exponent even for whole values
        format!("{:?}", d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cel2sql_diagnostics::C2S0300;
    use chrono::{NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn fmt(value: Literal, ty: Type) -> String {
        format_literal(&value, &ty).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(fmt(Literal::from("John Doe"), Type::String), "'John Doe'");
        assert_eq!(fmt(Literal::Int(24), Type::Int), "24");
        assert_eq!(fmt(Literal::Int(-7), Type::Int), "-7");
        assert_eq!(fmt(Literal::Uint(7), Type::Uint), "7");
        assert_eq!(fmt(Literal::Bool(true), Type::Bool), "TRUE");
        assert_eq!(fmt(Literal::Bool(false), Type::Bool), "FALSE");
        assert_eq!(fmt(Literal::Bytes(b"ab".to_vec()), Type::Bytes), "b'ab'");
        assert_eq!(fmt(Literal::Null, Type::Null), "NULL");
        assert_eq!(fmt(Literal::Null, Type::String), "NULL");
    }

    #[test]
    fn test_double_keeps_decimal_point() {
        assert_eq!(fmt(Literal::Double(1.0), Type::Double), "1.0");
        assert_eq!(fmt(Literal::Double(-0.5), Type::Double), "-0.5");
        assert_eq!(fmt(Literal::Double(1e20), Type::Double), "1e20");
        assert_eq!(
            fmt(Literal::Double(f64::NAN), Type::Double),
            "CAST('NaN' AS FLOAT64)"
        );
        assert_eq!(
            fmt(Literal::Double(f64::NEG_INFINITY), Type::Double),
            "CAST('-inf' AS FLOAT64)"
        );
    }

    #[test]
    fn test_temporal() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            fmt(Literal::Timestamp(ts), Type::Timestamp),
            "TIMESTAMP '2024-01-15 10:30:00+00'"
        );

        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(fmt(Literal::Date(date), Type::Date), "DATE '2024-01-15'");

        let time = NaiveTime::from_hms_milli_opt(8, 5, 3, 250).unwrap();
        assert_eq!(fmt(Literal::Time(time), Type::Time), "TIME '08:05:03.250'");

        let dt = date.and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(
            fmt(Literal::DateTime(dt), Type::DateTime),
            "DATETIME '2024-01-15 23:59:59'"
        );

        assert_eq!(
            fmt(Literal::Duration(TimeDelta::minutes(90)), Type::Duration),
            "INTERVAL 90 MINUTE"
        );
    }

    #[test]
    fn test_temporal_microsecond_precision() {
        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        assert_eq!(
            fmt(Literal::Timestamp(ts), Type::Timestamp),
            "TIMESTAMP '2023-11-14 22:13:20.123456+00'"
        );

        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let err = format_literal(&Literal::Timestamp(ts), &Type::Timestamp).unwrap_err();
        assert_eq!(err.code(), C2S0300);

        let time = NaiveTime::from_hms_nano_opt(8, 5, 3, 1).unwrap();
        assert!(format_literal(&Literal::Time(time), &Type::Time).is_err());

        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_nano_opt(0, 0, 0, 500)
            .unwrap();
        assert!(format_literal(&Literal::DateTime(dt), &Type::DateTime).is_err());
    }

    #[test]
    fn test_type_mismatch_is_render_error() {
        let err = format_literal(&Literal::from("24"), &Type::Int).unwrap_err();
        assert!(err.is_render());

        let err = format_literal(&Literal::Int(1), &Type::list(Type::Int)).unwrap_err();
        assert!(err.is_render());
        assert!(err.to_string().contains("list(int)"));
    }

    #[test]
    fn test_uint_out_of_range() {
        let err = format_literal(&Literal::Uint(u64::MAX), &Type::Uint).unwrap_err();
        assert!(err.is_render());
    }
}
