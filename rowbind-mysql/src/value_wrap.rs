use rowbind_core::Value;

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<mysql_async::Value> for ValueWrap {
    fn from(value: mysql_async::Value) -> Self {
        type MySqlValue = mysql_async::Value;
        ValueWrap(match value {
            MySqlValue::NULL => Value::Null,
            MySqlValue::Bytes(v) => match String::from_utf8(v) {
                Ok(v) => Value::Varchar(Some(v)),
                Err(e) => Value::Blob(Some(e.into_bytes().into())),
            },
            MySqlValue::Int(v) => Value::Int64(Some(v)),
            MySqlValue::UInt(v) => match i64::try_from(v) {
                Ok(v) => Value::Int64(Some(v)),
                Err(..) => Value::Float64(Some(v as f64)),
            },
            MySqlValue::Float(v) => Value::Float64(Some(v as f64)),
            MySqlValue::Double(v) => Value::Float64(Some(v)),
            MySqlValue::Date(year, month, day, hour, minute, second, micro) => {
                Value::Varchar(Some(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micro:06}"
                )))
            }
            MySqlValue::Time(negative, days, hours, minutes, seconds, micro) => {
                Value::Varchar(Some(format!(
                    "{}{}:{minutes:02}:{seconds:02}.{micro:06}",
                    if negative { "-" } else { "" },
                    days * 24 + hours as u32,
                )))
            }
        })
    }
}

impl From<ValueWrap> for mysql_async::Value {
    fn from(value: ValueWrap) -> Self {
        type MySqlValue = mysql_async::Value;
        match value.0 {
            _ if value.0.is_null() => MySqlValue::NULL,
            Value::Boolean(Some(v)) => MySqlValue::Int(v as i64),
            Value::Int64(Some(v)) => MySqlValue::Int(v),
            Value::Float64(Some(v)) => MySqlValue::Double(v),
            Value::Varchar(Some(v)) => MySqlValue::Bytes(v.into_bytes()),
            Value::Blob(Some(v)) => MySqlValue::Bytes(v.into_vec()),
            _ => MySqlValue::NULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_bytes() {
        let ValueWrap(value) = mysql_async::Value::Bytes(b"hello".to_vec()).into();
        assert_eq!(value, Value::Varchar(Some("hello".into())));
        let ValueWrap(value) = mysql_async::Value::Bytes(vec![0xff, 0xfe]).into();
        assert_eq!(value, Value::Blob(Some([0xff, 0xfe].into())));
    }

    #[test]
    fn unsigned_integers() {
        let ValueWrap(value) = mysql_async::Value::UInt(42).into();
        assert_eq!(value, Value::Int64(Some(42)));
    }

    #[test]
    fn round_trip_parameters() {
        let value: mysql_async::Value = ValueWrap(Value::Boolean(Some(true))).into();
        assert_eq!(value, mysql_async::Value::Int(1));
        let value: mysql_async::Value = ValueWrap(Value::Varchar(None)).into();
        assert_eq!(value, mysql_async::Value::NULL);
    }
}
