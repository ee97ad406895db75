/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```rust
/// use simple_serializer::{value, Value};
///
/// let v = value!({ "a": "b", "c": ["d"], "n": null });
/// assert!(v.is_mapping());
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Mapping($crate::Mapping::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut mapping = $crate::Mapping::new();
        $(
            mapping.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Mapping(mapping)
    }};

    // Anything else goes through `From`.
    ($s:expr) => {
        $crate::Value::from($s)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Mapping, Number, Value};

    #[test]
    fn test_value_macro_primitives() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(true), Value::Bool(true));
        assert_eq!(value!(false), Value::Bool(false));
        assert_eq!(value!(42), Value::Number(Number::Integer(42)));
        assert_eq!(value!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(value!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_value_macro_lists() {
        assert_eq!(value!([]), Value::List(vec![]));

        match value!([1, "two", null]) {
            Value::List(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0], Value::Number(Number::Integer(1)));
                assert_eq!(items[1], Value::String("two".to_string()));
                assert_eq!(items[2], Value::Null);
            }
            _ => panic!("Expected list"),
        }
    }

    #[test]
    fn test_value_macro_mappings() {
        assert_eq!(value!({}), Value::Mapping(Mapping::new()));

        match value!({ "name": "Alice", "tags": ["x"] }) {
            Value::Mapping(map) => {
                let keys: Vec<_> = map.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["name", "tags"]);
                assert_eq!(map.get("tags"), Some(&value!(["x"])));
            }
            _ => panic!("Expected mapping"),
        }
    }
}
