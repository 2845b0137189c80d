use minijinja::value::{StructObject, Value};
use std::fmt;

/// Statements inside a lease block that carry a single field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Hostname,
    MacAddress,
    Starts,
    Ends,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::Hostname => write!(f, "hostname"),
            Field::MacAddress => write!(f, "macaddress"),
            Field::Starts => write!(f, "starts"),
            Field::Ends => write!(f, "ends"),
        }
    }
}

/// Fields collected from one `lease <address> { ... }` block.
///
/// An empty string means the block had no such statement. Timestamps are kept
/// exactly as written in the leases file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LeaseRecord {
    pub address: String,
    pub hostname: String,
    pub mac_address: String,
    pub starts: String,
    pub ends: String,
}

impl LeaseRecord {
    pub fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Hostname => &mut self.hostname,
            Field::MacAddress => &mut self.mac_address,
            Field::Starts => &mut self.starts,
            Field::Ends => &mut self.ends,
        };
        value.clone_into(slot);
    }

    pub fn is_empty(&self) -> bool {
        *self == LeaseRecord::default()
    }

    /// Whether the record can be written as a hosts file entry: both an address
    /// and a hostname, and the hostname is a single word.
    pub fn has_host_entry(&self) -> bool {
        !self.address.is_empty() && !self.hostname.is_empty() && !self.hostname.contains(' ')
    }
}

impl StructObject for LeaseRecord {
    fn get_field(&self, field: &str) -> Option<Value> {
        match field {
            "address" => Some(Value::from(self.address.as_str())),
            "hostname" => Some(Value::from(self.hostname.as_str())),
            "mac_address" => Some(Value::from(self.mac_address.as_str())),
            "starts" => Some(Value::from(self.starts.as_str())),
            "ends" => Some(Value::from(self.ends.as_str())),
            _ => None,
        }
    }

    fn static_fields(&self) -> Option<&'static [&'static str]> {
        Some(&["address", "hostname", "mac_address", "starts", "ends"])
    }
}

impl From<LeaseRecord> for Value {
    fn from(record: LeaseRecord) -> Self {
        Value::from_struct_object(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, hostname: &str) -> LeaseRecord {
        LeaseRecord {
            address: address.to_string(),
            hostname: hostname.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn host_entry_needs_address_and_single_word_hostname() {
        assert!(record("10.0.0.5", "foo").has_host_entry());
        assert!(!record("", "foo").has_host_entry());
        assert!(!record("10.0.0.5", "").has_host_entry());
        assert!(!record("10.0.0.5", "My PC").has_host_entry());
    }

    #[test]
    fn set_overwrites_previous_value() {
        let mut lease = LeaseRecord::default();
        lease.set(Field::MacAddress, "aa:aa:aa:aa:aa:aa");
        lease.set(Field::MacAddress, "bb:bb:bb:bb:bb:bb");
        assert_eq!(lease.mac_address, "bb:bb:bb:bb:bb:bb");
        assert!(lease.hostname.is_empty());
    }

    #[test]
    fn template_view_exposes_all_fields() {
        let lease = LeaseRecord {
            address: "10.0.0.5".to_string(),
            hostname: "foo".to_string(),
            mac_address: "aa:bb:cc:dd:ee:ff".to_string(),
            starts: "2024/01/01 00:00:00".to_string(),
            ends: "2024/01/02 00:00:00".to_string(),
        };
        assert_eq!(lease.get_field("ends"), Some(Value::from("2024/01/02 00:00:00")));
        assert_eq!(lease.get_field("client"), None);
        assert_eq!(lease.static_fields().map(|f| f.len()), Some(5));
    }
}
