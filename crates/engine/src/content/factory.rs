use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::entity::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnerParseError {
    #[error("spawner `{text}` has no entity type name")]
    MissingName { text: String },
    #[error("expected '{expected}' at offset {offset} in spawner `{text}`")]
    Expected {
        expected: char,
        offset: usize,
        text: String,
    },
    #[error("unterminated string in spawner `{text}`")]
    UnterminatedString { text: String },
    #[error("unexpected input at offset {offset} in spawner `{text}`")]
    TrailingInput { offset: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    #[error("unknown entity type `{0}`")]
    UnknownType(String),
    #[error("config key `{key}` expects {expected}, got `{value}`")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// A parsed spawner name: `name`, `name(a,b)` or `name("text, with comma")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnerCall {
    pub name: String,
    pub args: Vec<String>,
}

pub fn parse_spawner_call(text: &str) -> Result<SpawnerCall, SpawnerParseError> {
    let mut cursor = Cursor {
        text,
        chars: text.char_indices().peekable(),
    };
    cursor.skip_whitespace();
    let name = cursor.identifier();
    if name.is_empty() {
        return Err(SpawnerParseError::MissingName {
            text: text.to_string(),
        });
    }

    let mut args = Vec::new();
    cursor.skip_whitespace();
    if cursor.accept('(') {
        let mut first = true;
        loop {
            cursor.skip_whitespace();
            if cursor.accept(')') {
                break;
            }
            if !first {
                cursor.expect(',')?;
                cursor.skip_whitespace();
            }
            args.push(cursor.argument()?);
            first = false;
        }
    }

    cursor.skip_whitespace();
    if let Some((offset, _)) = cursor.chars.peek() {
        return Err(SpawnerParseError::TrailingInput {
            offset: *offset,
            text: text.to_string(),
        });
    }
    Ok(SpawnerCall { name, args })
}

struct Cursor<'a> {
    text: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Cursor<'_> {
    fn accept(&mut self, wanted: char) -> bool {
        self.chars.next_if(|(_, c)| *c == wanted).is_some()
    }

    fn expect(&mut self, wanted: char) -> Result<(), SpawnerParseError> {
        if self.accept(wanted) {
            return Ok(());
        }
        let offset = self
            .chars
            .peek()
            .map_or(self.text.len(), |(offset, _)| *offset);
        Err(SpawnerParseError::Expected {
            expected: wanted,
            offset,
            text: self.text.to_string(),
        })
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn identifier(&mut self) -> String {
        let mut out = String::new();
        while let Some((_, c)) = self
            .chars
            .next_if(|(_, c)| c.is_ascii_alphanumeric() || matches!(*c, '_' | '-' | '.'))
        {
            out.push(c);
        }
        out
    }

    fn argument(&mut self) -> Result<String, SpawnerParseError> {
        if !self.accept('"') {
            return Ok(self.identifier());
        }
        let mut out = String::new();
        for (_, c) in self.chars.by_ref() {
            if c == '"' {
                return Ok(out);
            }
            out.push(c);
        }
        Err(SpawnerParseError::UnterminatedString {
            text: self.text.to_string(),
        })
    }
}

/// String key/value configuration handed to an entity constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityConfig {
    values: BTreeMap<String, String>,
}

impl EntityConfig {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Descriptor values plus positional arguments stored under `"0"`, `"1"`, ...
    pub fn from_call(mut values: BTreeMap<String, String>, args: Vec<String>) -> Self {
        for (index, arg) in args.into_iter().enumerate() {
            values.insert(index.to_string(), arg);
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn get_int(&self, key: &str, default: i32) -> Result<i32, FactoryError> {
        self.parse(key, default, "an integer")
    }

    pub fn get_float(&self, key: &str, default: f32) -> Result<f32, FactoryError> {
        self.parse(key, default, "a number")
    }

    fn parse<T: std::str::FromStr>(
        &self,
        key: &str,
        default: T,
        expected: &'static str,
    ) -> Result<T, FactoryError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        raw.trim()
            .parse::<T>()
            .map_err(|_| FactoryError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                expected,
            })
    }
}

pub type Constructor = Box<dyn Fn(&EntityConfig) -> Result<Box<dyn Entity>, FactoryError>>;

/// Maps entity type names to constructors.
#[derive(Default)]
pub struct EntityFactory {
    constructors: BTreeMap<String, Constructor>,
}

impl fmt::Debug for EntityFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

impl EntityFactory {
    /// Registers `constructor` under `name`, replacing any earlier registration.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&EntityConfig) -> Result<Box<dyn Entity>, FactoryError> + 'static,
    ) -> &mut Self {
        self.constructors.insert(name.into(), Box::new(constructor));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn create(&self, name: &str, config: &EntityConfig) -> Result<Box<dyn Entity>, FactoryError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| FactoryError::UnknownType(name.to_string()))?;
        constructor(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityState;

    fn call(name: &str, args: &[&str]) -> SpawnerCall {
        SpawnerCall {
            name: name.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    #[test]
    fn parses_bare_names_and_argument_lists() {
        assert_eq!(parse_spawner_call("spikes"), Ok(call("spikes", &[])));
        assert_eq!(
            parse_spawner_call("detector(3)"),
            Ok(call("detector", &["3"]))
        );
        assert_eq!(
            parse_spawner_call("room_boundary(2, -12.5, 0)"),
            Ok(call("room_boundary", &["2", "-12.5", "0"]))
        );
        assert_eq!(parse_spawner_call("blocker()"), Ok(call("blocker", &[])));
    }

    #[test]
    fn quoted_arguments_keep_commas_and_spaces() {
        assert_eq!(
            parse_spawner_call(r#"sign("hello, world", 2)"#),
            Ok(call("sign", &["hello, world", "2"]))
        );
    }

    #[test]
    fn malformed_calls_are_rejected() {
        assert!(matches!(
            parse_spawner_call("(3)"),
            Err(SpawnerParseError::MissingName { .. })
        ));
        assert!(matches!(
            parse_spawner_call("detector(3 4)"),
            Err(SpawnerParseError::Expected { expected: ',', .. })
        ));
        assert!(matches!(
            parse_spawner_call("detector(3"),
            Err(SpawnerParseError::Expected { expected: ',', .. })
        ));
        assert!(matches!(
            parse_spawner_call(r#"sign("oops)"#),
            Err(SpawnerParseError::UnterminatedString { .. })
        ));
        assert!(matches!(
            parse_spawner_call("detector(3) extra"),
            Err(SpawnerParseError::TrailingInput { .. })
        ));
    }

    #[test]
    fn positional_arguments_override_descriptor_values() {
        let mut values = BTreeMap::new();
        values.insert("0".to_string(), "old".to_string());
        values.insert("speed".to_string(), "2".to_string());
        let config = EntityConfig::from_call(values, vec!["7".to_string()]);

        assert_eq!(config.get_int("0", 0), Ok(7));
        assert_eq!(config.get_int("speed", 1), Ok(2));
        assert_eq!(config.get_int("missing", 5), Ok(5));
        assert_eq!(config.get_string("missing", "x"), "x");
        assert!(matches!(
            EntityConfig::from_call(BTreeMap::new(), vec!["seven".to_string()]).get_int("0", 0),
            Err(FactoryError::InvalidValue { .. })
        ));
    }

    struct Marker {
        state: EntityState,
    }

    impl Entity for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn state(&self) -> &EntityState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut EntityState {
            &mut self.state
        }
    }

    #[test]
    fn factory_creates_registered_types_only() {
        let mut factory = EntityFactory::default();
        factory.register("marker", |config| {
            let mut state = EntityState::default();
            state.body.pos.x = config.get_float("0", 0.0)?;
            Ok(Box::new(Marker { state }) as Box<dyn Entity>)
        });

        let config = EntityConfig::from_call(BTreeMap::new(), vec!["2.5".to_string()]);
        let created = factory.create("marker", &config).expect("marker");
        assert_eq!(created.body().pos.x, 2.5);
        assert!(matches!(
            factory.create("dragon", &config),
            Err(FactoryError::UnknownType(name)) if name == "dragon"
        ));
        assert_eq!(factory.names().collect::<Vec<_>>(), vec!["marker"]);
    }
}
