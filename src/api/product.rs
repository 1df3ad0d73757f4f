//! IONOS Cloud products and their API endpoints

use std::fmt;
use tracing::warn;

use crate::api::location::{self, Location};
use crate::error::CliResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    Compute,
    Cdn,
    Kafka,
    InMemoryDb,
    MongoDb,
    PostgreSql,
    ContainerRegistry,
    CertManager,
    Dns,
    VmAutoscaling,
}

/// Where a product's API is served from
#[derive(Debug, Clone, Copy)]
pub enum Endpoint {
    /// One URL for every location
    Global(&'static str),
    /// `https://<subdomain>.<region>.ionos.com`
    Regional {
        subdomain: &'static str,
        default_location: &'static str,
        locations: &'static [&'static str],
    },
}

const ALL_REGIONS: &[&str] = &[
    "de/fra", "de/txl", "es/vit", "fr/par", "gb/lhr", "gb/bhx", "us/las", "us/ewr", "us/mci",
];

impl Product {
    pub fn name(self) -> &'static str {
        match self {
            Product::Compute => "compute",
            Product::Cdn => "cdn",
            Product::Kafka => "kafka",
            Product::InMemoryDb => "in-memory-db",
            Product::MongoDb => "mongodb",
            Product::PostgreSql => "postgresql",
            Product::ContainerRegistry => "container-registry",
            Product::CertManager => "certmanager",
            Product::Dns => "dns",
            Product::VmAutoscaling => "vm-autoscaling",
        }
    }

    pub fn endpoint(self) -> Endpoint {
        match self {
            Product::Compute => Endpoint::Global("https://api.ionos.com/cloudapi/v6"),
            Product::MongoDb => Endpoint::Global("https://api.ionos.com/databases/mongodb"),
            Product::PostgreSql => Endpoint::Global("https://api.ionos.com/databases/postgresql"),
            Product::ContainerRegistry => {
                Endpoint::Global("https://api.ionos.com/containerregistries")
            }
            Product::VmAutoscaling => Endpoint::Global("https://api.ionos.com/autoscaling"),
            Product::Cdn => Endpoint::Regional {
                subdomain: "cdn",
                default_location: "de/fra",
                locations: &["de/fra"],
            },
            Product::Kafka => Endpoint::Regional {
                subdomain: "kafka",
                default_location: "de/fra",
                locations: ALL_REGIONS,
            },
            Product::InMemoryDb => Endpoint::Regional {
                subdomain: "in-memory-db",
                default_location: "de/fra",
                locations: ALL_REGIONS,
            },
            Product::CertManager => Endpoint::Regional {
                subdomain: "certificate-manager",
                default_location: "de/fra",
                locations: &["de/fra"],
            },
            Product::Dns => Endpoint::Regional {
                subdomain: "dns",
                default_location: "de/fra",
                locations: &["de/fra"],
            },
        }
    }

    /// The location requests go to: the given one normalized, or the
    /// product's default. `None` for global products.
    pub fn effective_location(self, location: Option<&str>) -> CliResult<Option<Location>> {
        match self.endpoint() {
            Endpoint::Global(_) => Ok(None),
            Endpoint::Regional {
                default_location, ..
            } => location::normalize(location.unwrap_or(default_location)).map(Some),
        }
    }

    /// Base URL for this product, optionally at a specific location.
    ///
    /// Global products ignore the location.
    pub fn base_url(self, location: Option<&str>) -> CliResult<String> {
        match self.endpoint() {
            Endpoint::Global(url) => {
                if let Some(loc) = location {
                    warn!("{} is not regional, ignoring location {}", self, loc);
                }
                Ok(url.to_string())
            }
            Endpoint::Regional {
                subdomain,
                default_location,
                locations,
            } => {
                let loc = location::normalize(location.unwrap_or(default_location))?;
                if !locations.contains(&loc.to_string().as_str()) {
                    warn!(
                        "{} is not a documented location for {} (known: {})",
                        loc,
                        self,
                        locations.join(", ")
                    );
                }
                Ok(format!("https://{}.{}.ionos.com", subdomain, loc.region()))
            }
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_product_url() {
        assert_eq!(
            Product::Compute.base_url(None).unwrap(),
            "https://api.ionos.com/cloudapi/v6"
        );
        assert_eq!(
            Product::MongoDb.base_url(Some("de/fra")).unwrap(),
            "https://api.ionos.com/databases/mongodb"
        );
    }

    #[test]
    fn test_regional_default_location() {
        assert_eq!(
            Product::Cdn.base_url(None).unwrap(),
            "https://cdn.de-fra.ionos.com"
        );
    }

    #[test]
    fn test_regional_location_is_normalized() {
        assert_eq!(
            Product::Kafka.base_url(Some("GB-LHR")).unwrap(),
            "https://kafka.gb-lhr.ionos.com"
        );
        assert_eq!(
            Product::InMemoryDb.base_url(Some("ewr")).unwrap(),
            "https://in-memory-db.us-ewr.ionos.com"
        );
    }

    #[test]
    fn test_effective_location_applies_default() {
        assert_eq!(Product::Compute.effective_location(Some("de/fra")).unwrap(), None);
        let default = Product::InMemoryDb.effective_location(None).unwrap();
        assert_eq!(default.map(|l| l.to_string()).as_deref(), Some("de/fra"));
        let given = Product::InMemoryDb.effective_location(Some("TXL")).unwrap();
        assert_eq!(given.map(|l| l.to_string()).as_deref(), Some("de/txl"));
    }

    #[test]
    fn test_regional_bad_location() {
        assert!(Product::Kafka.base_url(Some("nowhere")).is_err());
    }
}
