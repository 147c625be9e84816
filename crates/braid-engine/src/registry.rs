//! Interface creation and the [`InterfaceSet`] registry.

use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};

use braid_transport::{Partition, Transport, TransportError};
use indexmap::IndexMap;

use crate::config::{ConfigError, InterfaceConfig};
use crate::interface::Interface;

// ── RegistryError ──────────────────────────────────────────────────

/// Errors from [`create_interfaces`].
#[derive(Debug, PartialEq)]
pub enum RegistryError {
    /// The run name was empty or contained `/`.
    InvalidRunName {
        /// The rejected name.
        run: String,
    },
    /// An interface name was empty.
    EmptyInterfaceName {
        /// Position of the empty name in the request.
        index: usize,
    },
    /// The same interface name was requested twice.
    DuplicateInterfaceName {
        /// The repeated name.
        name: String,
    },
    /// The shared configuration failed validation.
    Config(ConfigError),
    /// The transport could not open the channels.
    Transport(TransportError),
    /// The transport returned a different number of links than requested.
    LinkCountMismatch {
        /// Links requested.
        expected: usize,
        /// Links returned.
        got: usize,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRunName { run } => write!(f, "invalid run name {run:?}"),
            Self::EmptyInterfaceName { index } => {
                write!(f, "interface name at position {index} is empty")
            }
            Self::DuplicateInterfaceName { name } => {
                write!(f, "interface name {name:?} requested more than once")
            }
            Self::Config(e) => write!(f, "invalid interface config: {e}"),
            Self::Transport(e) => write!(f, "transport setup failed: {e}"),
            Self::LinkCountMismatch { expected, got } => {
                write!(f, "transport opened {got} link(s), expected {expected}")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for RegistryError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TransportError> for RegistryError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ── create_interfaces ──────────────────────────────────────────────

/// Create one interface per name for the rank described by `partition`.
///
/// Collective over the transport: every rank of the world calls this
/// with the same `run` and `names`. Names are validated before the
/// transport is contacted, so a rejected request opens nothing. The
/// returned set preserves request order.
pub fn create_interfaces<S: AsRef<str>>(
    run: &str,
    names: &[S],
    partition: &Partition,
    transport: &dyn Transport,
    config: &InterfaceConfig,
) -> Result<InterfaceSet, RegistryError> {
    if run.is_empty() || run.contains('/') {
        return Err(RegistryError::InvalidRunName {
            run: run.to_owned(),
        });
    }
    config.validate()?;

    let mut channels: Vec<String> = Vec::with_capacity(names.len());
    for (index, name) in names.iter().map(AsRef::as_ref).enumerate() {
        if name.is_empty() {
            return Err(RegistryError::EmptyInterfaceName { index });
        }
        if channels.iter().any(|c| c == name) {
            return Err(RegistryError::DuplicateInterfaceName {
                name: name.to_owned(),
            });
        }
        channels.push(name.to_owned());
    }

    let links = transport.open(partition, run, &channels)?;
    if links.len() != channels.len() {
        return Err(RegistryError::LinkCountMismatch {
            expected: channels.len(),
            got: links.len(),
        });
    }

    let mut interfaces = IndexMap::with_capacity(links.len());
    for (name, link) in channels.into_iter().zip(links) {
        let iface = Interface::new(run, config, link);
        log::info!(
            "{}: rank {} ({} #{}) bound with {} peer(s)",
            iface.uri(),
            partition.rank(),
            partition.app(),
            partition.app_rank(),
            iface.peers().len()
        );
        interfaces.insert(name, iface);
    }
    Ok(InterfaceSet { interfaces })
}

// ── InterfaceSet ───────────────────────────────────────────────────

/// The interfaces created by one [`create_interfaces`] call, by name.
#[derive(Debug)]
pub struct InterfaceSet {
    interfaces: IndexMap<String, Interface>,
}

impl InterfaceSet {
    /// Look up an interface by name.
    pub fn get(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }

    /// Look up an interface by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Interface> {
        self.interfaces.get_mut(name)
    }

    /// Take an interface out of the set, e.g. to move it to another
    /// thread.
    pub fn remove(&mut self, name: &str) -> Option<Interface> {
        self.interfaces.shift_remove(name)
    }

    /// Interface names in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.keys().map(String::as_str)
    }

    /// Number of interfaces.
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Interfaces in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Interface)> {
        self.interfaces.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Interfaces in creation order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Interface)> {
        self.interfaces.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Unwrap into the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<String, Interface> {
        self.interfaces
    }
}

impl Index<&str> for InterfaceSet {
    type Output = Interface;

    /// # Panics
    ///
    /// Panics if no interface is named `name`.
    fn index(&self, name: &str) -> &Interface {
        &self.interfaces[name]
    }
}

impl IndexMut<&str> for InterfaceSet {
    fn index_mut(&mut self, name: &str) -> &mut Interface {
        &mut self.interfaces[name]
    }
}

impl IntoIterator for InterfaceSet {
    type Item = (String, Interface);
    type IntoIter = indexmap::map::IntoIter<String, Interface>;

    fn into_iter(self) -> Self::IntoIter {
        self.interfaces.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::Rank;
    use braid_transport::{split_by_app, LocalBus};

    fn solo() -> (Partition, LocalBus) {
        let parts = split_by_app(&["ping"]).unwrap();
        (parts[0].clone(), LocalBus::new(1))
    }

    #[test]
    fn creates_in_request_order() {
        let (part, bus) = solo();
        let set = create_interfaces(
            "ping",
            &["ifs2", "ifs1"],
            &part,
            &bus,
            &InterfaceConfig::default(),
        )
        .unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["ifs2", "ifs1"]);
        assert_eq!(set["ifs1"].uri(), "braid://ping/ifs1");
        assert_eq!(set["ifs2"].rank(), Rank(0));
        assert!(set["ifs1"].peers().is_empty());
    }

    #[test]
    fn duplicate_name_rejected_before_open() {
        let (part, bus) = solo();
        let err = create_interfaces(
            "ping",
            &["ifs1", "ifs2", "ifs1"],
            &part,
            &bus,
            &InterfaceConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateInterfaceName {
                name: "ifs1".into()
            }
        );
        // Nothing was registered, so a later valid call still succeeds.
        assert!(create_interfaces("ping", &["ifs1"], &part, &bus, &InterfaceConfig::default()).is_ok());
    }

    #[test]
    fn empty_name_and_bad_run_rejected() {
        let (part, bus) = solo();
        let cfg = InterfaceConfig::default();
        assert_eq!(
            create_interfaces("ping", &["a", ""], &part, &bus, &cfg).unwrap_err(),
            RegistryError::EmptyInterfaceName { index: 1 }
        );
        assert!(matches!(
            create_interfaces("", &["a"], &part, &bus, &cfg),
            Err(RegistryError::InvalidRunName { .. })
        ));
        assert!(matches!(
            create_interfaces("a/b", &["a"], &part, &bus, &cfg),
            Err(RegistryError::InvalidRunName { .. })
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let (part, bus) = solo();
        let err = create_interfaces("ping", &["a"], &part, &bus, &InterfaceConfig::with_dimensions(0))
            .unwrap_err();
        assert_eq!(err, RegistryError::Config(ConfigError::ZeroDimensions));
        assert!(err.source().is_some());
    }

    #[test]
    fn transport_errors_propagate() {
        let parts = split_by_app(&["ping", "pong"]).unwrap();
        let bus = LocalBus::new(1);
        let err = create_interfaces("ping", &["a"], &parts[0], &bus, &InterfaceConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Transport(TransportError::WorldSizeMismatch { .. })
        ));
    }

    #[test]
    fn interfaces_are_independent() {
        let (part, bus) = solo();
        let mut set = create_interfaces(
            "ping",
            &["ifs1", "ifs2"],
            &part,
            &bus,
            &InterfaceConfig::default(),
        )
        .unwrap();
        set["ifs1"].push("data", [0.0, 0.0], 1.0).unwrap();
        set["ifs1"].commit(0u64).unwrap();
        assert_eq!(set["ifs2"].pending_len(), 0);
        assert_eq!(set["ifs2"].last_committed(), None);

        let ifs2 = set.remove("ifs2").unwrap();
        assert_eq!(ifs2.name(), "ifs2");
        assert_eq!(set.len(), 1);
        assert!(set.get("ifs2").is_none());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            RegistryError::DuplicateInterfaceName {
                name: "ifs1".into()
            }
            .to_string(),
            "interface name \"ifs1\" requested more than once"
        );
    }
}
