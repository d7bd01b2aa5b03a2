//! Serde helpers for extended reals.
//!
//! JSON has no infinity, and the default λ domain is `[0, +∞)`. Non-finite
//! values are written as the strings `"inf"`, `"-inf"` and `"nan"`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Finite(f64),
    Named(String),
}

pub mod extended_f64 {
    use super::*;

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_f64(*v)
        } else if v.is_nan() {
            s.serialize_str("nan")
        } else if v.is_sign_positive() {
            s.serialize_str("inf")
        } else {
            s.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Repr::deserialize(d)? {
            Repr::Finite(v) => Ok(v),
            Repr::Named(name) => name
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("not a number: '{name}'"))),
        }
    }
}

/// Same encoding for sequences (partition thresholds).
pub mod extended_f64_vec {
    use super::*;

    #[derive(Serialize)]
    struct Ser(#[serde(with = "extended_f64")] f64);

    #[derive(Deserialize)]
    struct De(#[serde(with = "extended_f64")] f64);

    pub fn serialize<S: Serializer>(v: &[f64], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(v.iter().map(|x| Ser(*x)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        let raw = Vec::<De>::deserialize(d)?;
        Ok(raw.into_iter().map(|x| x.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Bounds {
        #[serde(with = "super::extended_f64")]
        lo: f64,
        #[serde(with = "super::extended_f64")]
        hi: f64,
    }

    #[test]
    fn infinity_survives_json() {
        let b = Bounds {
            lo: 0.0,
            hi: f64::INFINITY,
        };
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, r#"{"lo":0.0,"hi":"inf"}"#);
        let back: Bounds = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Points(#[serde(with = "super::extended_f64_vec")] Vec<f64>);

    #[test]
    fn sequences_mix_finite_and_infinite() {
        let p = Points(vec![f64::NEG_INFINITY, 1.5, f64::INFINITY]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"["-inf",1.5,"inf"]"#);
        let back: Points = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
