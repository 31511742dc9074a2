use crate::common::EcError;
use crate::curve::Curve;
use crate::field::PrimeField;
use crate::point::Point;
use anyhow::{anyhow, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Field, curve and default origin, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub prime: i64,
    pub a: i64,
    pub b: i64,
    /// `x,y` or `inf`.
    #[serde(default)]
    pub origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prime: 11,
            a: 0,
            b: 7,
            origin: Some("4,4".to_owned()),
        }
    }
}

impl Config {
    /// ~/.config/ecgroup/config.toml
    pub fn default_path() -> PathBuf {
        let home_path = env::var("HOME").unwrap_or("/".to_owned());
        let full_path = Path::new(&home_path);
        #[cfg(target_os = "windows")]
        let full_path = full_path.join("ecgroup/");
        #[cfg(not(target_os = "windows"))]
        let full_path = full_path.join(".config/ecgroup/");
        full_path.join("config.toml")
    }

    /// An explicit path must exist. Without one, a missing default file
    /// falls back to the built-in curve.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let full_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::default_path();
                if !p.is_file() {
                    info!("no config at {}, using defaults", p.display());
                    return Ok(Self::default());
                }
                p
            }
        };
        let config = fs::read(&full_path)
            .with_context(|| format!("failed to read {}", full_path.display()))?;
        let config: Config = toml::from_slice(&config)
            .with_context(|| format!("failed to parse {}", full_path.display()))?;
        info!("loaded config from {}", full_path.display());
        Ok(config)
    }

    pub fn with_overrides(self, prime: Option<i64>, a: Option<i64>, b: Option<i64>) -> Self {
        Self {
            prime: prime.unwrap_or(self.prime),
            a: a.unwrap_or(self.a),
            b: b.unwrap_or(self.b),
            origin: self.origin,
        }
    }

    pub fn field(&self) -> Result<PrimeField, EcError> {
        PrimeField::new(self.prime)
    }

    pub fn curve(&self) -> Curve {
        Curve::new(self.a, self.b)
    }

    pub fn origin(&self) -> Result<Option<Point>> {
        self.origin
            .as_deref()
            .map(parse_point)
            .transpose()
            .map_err(|e| anyhow!("bad origin in config: {}", e))
    }
}

/// Parses `x,y` or `inf`.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("inf") {
        return Ok(Point::Infinity);
    }
    let s = s.trim_start_matches('(').trim_end_matches(')');
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y` or `inf`, got `{}`", s))?;
    let x = x.trim().parse::<i64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<i64>().map_err(|e| e.to_string())?;
    Ok(Point::new(x, y))
}

#[test]
fn test_parse_config() {
    let config: Config =
        toml::from_str("prime = 31\na = 0\nb = 7\norigin = \"25,16\"\n").unwrap();
    assert_eq!(config.prime, 31);
    assert_eq!(config.origin().unwrap(), Some(Point::new(25, 16)));
    assert!(config.field().is_ok());
    assert_eq!(config.curve(), Curve::new(0, 7));

    let config: Config = toml::from_str("prime = 12\na = 1\nb = 1\n").unwrap();
    assert_eq!(config.origin().unwrap(), None);
    assert_eq!(config.field(), Err(EcError::InvalidModulus(12)));
}

#[test]
fn test_config_origin_infinity() {
    let config: Config = toml::from_str("prime = 11\na = 0\nb = 7\norigin = \"inf\"\n").unwrap();
    assert_eq!(config.origin().unwrap(), Some(Point::Infinity));

    let config: Config = toml::from_str("prime = 11\na = 0\nb = 7\norigin = \"4\"\n").unwrap();
    assert!(config.origin().is_err());
}

#[test]
fn test_overrides() {
    let config = Config::default().with_overrides(Some(31), None, Some(3));
    assert_eq!(config.prime, 31);
    assert_eq!(config.a, 0);
    assert_eq!(config.b, 3);
    assert_eq!(config.origin.as_deref(), Some("4,4"));
}

#[test]
fn test_load_missing_explicit_path() {
    let path = env::temp_dir().join("ecgroup-does-not-exist/config.toml");
    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn test_load_file() {
    let dir = env::temp_dir().join(format!("ecgroup-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    fs::write(&path, toml::to_string(&Config::default()).unwrap()).unwrap();
    assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_parse_point() {
    assert_eq!(parse_point("4,4"), Ok(Point::new(4, 4)));
    assert_eq!(parse_point("(25, 16)"), Ok(Point::new(25, 16)));
    assert_eq!(parse_point("inf"), Ok(Point::Infinity));
    assert_eq!(parse_point("-1,3"), Ok(Point::new(-1, 3)));
    assert!(parse_point("4").is_err());
    assert!(parse_point("a,b").is_err());
}
