//! Template registry for header lookup by slot or name
//!
//! The registry is an ordinary value built by the program entry point and
//! handed to whatever needs to look templates up (the CLI, the frame
//! builder). Templates are shared read-only, so frames may be built from one
//! registry on several threads.

use crate::ethernet::{arp_template, eth_template};
use crate::fill::{FillHandler, TransportFill};
use crate::header::Header;
use crate::ip::{ipv4_template, ipv6_template};
use crate::tcp::tcp_template;
use crate::template::HeaderTemplate;
use crate::udp::udp_template;
use framecraft_core::{Error, Result, TemplateId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Summary of a registered template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: String,
    pub help: String,
    pub size: usize,
    pub field_count: usize,
}

/// Registry of header templates
pub struct TemplateRegistry {
    /// Map of slot to template
    by_id: RwLock<HashMap<TemplateId, Arc<HeaderTemplate>>>,
    /// Map of protocol name to slot
    by_name: RwLock<HashMap<String, TemplateId>>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        debug!("Creating new TemplateRegistry");
        Self {
            by_id: RwLock::new(HashMap::new()),
            by_name: RwLock::new(HashMap::new()),
        }
    }

    /// Registry holding the built-in eth, arp, ipv4, ipv6, udp and tcp
    /// templates
    pub fn with_builtin() -> Result<Self> {
        let registry = Self::new();
        let transport = FillHandler::Transport(TransportFill::new()?);

        registry.register(TemplateId::ETH, eth_template()?)?;
        registry.register(TemplateId::ARP, arp_template()?)?;
        registry.register(TemplateId::IPV4, ipv4_template()?)?;
        registry.register(TemplateId::IPV6, ipv6_template()?)?;
        registry.register(TemplateId::UDP, udp_template(transport.clone())?)?;
        registry.register(TemplateId::TCP, tcp_template(transport)?)?;

        info!(count = registry.len(), "Registered built-in header templates");
        Ok(registry)
    }

    /// Register a template under `id`.
    ///
    /// Returns an error if the slot or the template name is already taken.
    pub fn register(
        &self,
        id: TemplateId,
        template: HeaderTemplate,
    ) -> Result<Arc<HeaderTemplate>> {
        let name = template.name().to_string();

        // Both maps are checked and updated under their write locks so
        // concurrent registrations cannot interleave
        let mut by_id = self.by_id.write();
        let mut by_name = self.by_name.write();

        if by_id.contains_key(&id) {
            warn!(id = ?id, "Template slot already registered");
            return Err(Error::AlreadyExists(format!(
                "template slot {:?} already registered",
                id
            )));
        }
        if by_name.contains_key(&name) {
            warn!(name = %name, "Template name already registered");
            return Err(Error::AlreadyExists(format!(
                "template '{}' already registered",
                name
            )));
        }

        let template = Arc::new(template);
        by_id.insert(id, Arc::clone(&template));
        by_name.insert(name.clone(), id);

        debug!(id = ?id, name = %name, size = template.size(), "Template registered");
        Ok(template)
    }

    /// Remove the template in slot `id`
    pub fn unregister(&self, id: TemplateId) -> Result<()> {
        let mut by_id = self.by_id.write();
        let Some(template) = by_id.remove(&id) else {
            warn!(id = ?id, "Template not found");
            return Err(Error::NotFound(format!("template slot {:?}", id)));
        };

        self.by_name.write().remove(template.name());
        debug!(id = ?id, name = %template.name(), "Template unregistered");
        Ok(())
    }

    /// Get a template by protocol name
    pub fn get_by_name(&self, name: &str) -> Option<Arc<HeaderTemplate>> {
        let id = *self.by_name.read().get(name)?;
        self.get_by_id(id)
    }

    /// Get a template by slot
    pub fn get_by_id(&self, id: TemplateId) -> Option<Arc<HeaderTemplate>> {
        self.by_id.read().get(&id).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.read().contains_key(name)
    }

    /// Clone a fresh instance of the named template
    pub fn instantiate(&self, name: &str) -> Result<Header> {
        self.get_by_name(name)
            .map(|t| t.instantiate())
            .ok_or_else(|| Error::UnknownProtocol(name.to_string()))
    }

    /// List all registered templates, ordered by slot
    pub fn list(&self) -> Vec<TemplateInfo> {
        let by_id = self.by_id.read();
        let mut infos: Vec<TemplateInfo> = by_id
            .iter()
            .map(|(id, t)| TemplateInfo {
                id: *id,
                name: t.name().to_string(),
                help: t.help().to_string(),
                size: t.size(),
                field_count: t.fields().len(),
            })
            .collect();
        infos.sort_by_key(|info| info.id);
        infos
    }

    pub fn len(&self) -> usize {
        self.by_id.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every template
    pub fn clear(&self) {
        let mut by_id = self.by_id.write();
        let count = by_id.len();
        by_id.clear();
        self.by_name.write().clear();
        info!(count, "Cleared template registry");
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
