//! Capability names and the fixed capability catalog.
//!
//! capgate grants capabilities all-or-nothing: a role or user either holds
//! every entry of the catalog or none of them. The catalog is compiled in
//! and is never edited at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named permission checked by the host's authorization layer.
///
/// Capability names are plain host identifiers, e.g. "amelia_read_finance"
/// or "edit_posts".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(pub String);

impl Capability {
    /// Construct a capability from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Booking-domain capabilities, in declaration order.
pub const BOOKING_CAPABILITIES: &[&str] = &[
    "amelia_read_appointments",
    "amelia_manage_appointments",
    "amelia_manage_bookings",
    "amelia_manage_services",
    "amelia_manage_providers",
    "amelia_manage_customers",
    "amelia_manage_settings",
    "amelia_dashboard_access",
    "amelia_read_coupons",
    "amelia_read_services",
    "amelia_edit_services",
    "amelia_delete_services",
    "amelia_read_employees",
    "amelia_edit_employees",
    "amelia_delete_employees",
    "amelia_read_customers",
    "amelia_edit_customers",
    "amelia_delete_customers",
    "amelia_read_locations",
    "amelia_edit_locations",
    "amelia_delete_locations",
    "amelia_read_categories",
    "amelia_edit_categories",
    "amelia_delete_categories",
    "amelia_read_events",
    "amelia_manage_events",
    "amelia_edit_events",
    "amelia_delete_events",
    "amelia_read_packages",
    "amelia_manage_packages",
    "amelia_read_resources",
    "amelia_manage_resources",
    "amelia_read_extras",
    "amelia_manage_extras",
    "amelia_read_finance",
    "amelia_manage_finance",
    "amelia_edit_coupons",
    "amelia_delete_coupons",
    "amelia_read_notifications",
    "amelia_manage_notifications",
    "amelia_read_calendar",
    "amelia_manage_calendar",
    "amelia_export_data",
    "amelia_import_data",
];

/// Host capabilities the booking admin screens depend on.
pub const HOST_CAPABILITIES: &[&str] = &[
    // content
    "manage_options",
    "edit_posts",
    "edit_pages",
    "edit_others_posts",
    "edit_others_pages",
    "edit_published_posts",
    "edit_published_pages",
    "publish_posts",
    "publish_pages",
    "delete_posts",
    "delete_pages",
    "delete_others_posts",
    "delete_others_pages",
    "delete_published_posts",
    "delete_published_pages",
    "read",
    "upload_files",
    "edit_files",
    "import",
    "export",
    "manage_categories",
    "manage_links",
    "moderate_comments",
    // users
    "list_users",
    "edit_users",
    "create_users",
    "delete_users",
    "promote_users",
    "remove_users",
    "add_users",
    // site
    "edit_theme_options",
    "customize",
    "edit_dashboard",
    "unfiltered_html",
    // shop
    "manage_woocommerce",
    "edit_shop_orders",
    "edit_others_shop_orders",
    "edit_products",
    "view_woocommerce_reports",
    // themes, plugins, core
    "switch_themes",
    "edit_themes",
    "install_themes",
    "activate_plugins",
    "edit_plugins",
    "install_plugins",
    "update_plugins",
    "delete_plugins",
    "update_themes",
    "delete_themes",
    "update_core",
];

/// An ordered set of unique capabilities.
///
/// Iteration follows insertion order. Granting a capability that is already
/// present is a no-op, so the set never holds duplicates. Deserializing
/// goes through `grant` as well, so repeated names in input collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Capability>", into = "Vec<Capability>")]
pub struct CapabilitySet {
    inner: Vec<Capability>,
}

impl CapabilitySet {
    /// The fixed catalog every grant applies: booking capabilities first,
    /// then host capabilities.
    pub fn catalog() -> Self {
        BOOKING_CAPABILITIES
            .iter()
            .chain(HOST_CAPABILITIES)
            .map(|name| Capability::new(*name))
            .collect()
    }

    /// Grant a capability to this set.
    pub fn grant(&mut self, capability: Capability) {
        if !self.has(&capability) {
            self.inner.push(capability);
        }
    }

    /// Return true if the set contains the given capability.
    pub fn has(&self, capability: &Capability) -> bool {
        self.inner.contains(capability)
    }

    /// Return true if the set contains a capability with this name.
    pub fn has_name(&self, name: &str) -> bool {
        self.inner.iter().any(|c| c.0 == name)
    }

    /// Return an iterator over all granted capabilities, in order.
    pub fn all(&self) -> impl Iterator<Item = &Capability> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Keep only the members of `self` that also appear in `requested`,
    /// preserving the order of `self`.
    pub fn intersect(&self, requested: &[Capability]) -> CapabilitySet {
        self.inner
            .iter()
            .filter(|c| requested.contains(c))
            .cloned()
            .collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::default();
        for capability in iter {
            set.grant(capability);
        }
        set
    }
}

impl From<Vec<Capability>> for CapabilitySet {
    fn from(capabilities: Vec<Capability>) -> Self {
        capabilities.into_iter().collect()
    }
}

impl From<CapabilitySet> for Vec<Capability> {
    fn from(set: CapabilitySet) -> Self {
        set.inner
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a Capability;
    type IntoIter = std::slice::Iter<'a, Capability>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
