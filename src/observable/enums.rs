//! Observable entity vocabularies.

use serde::{Deserialize, Serialize};

/// Entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTypes {
    /// IPv4 or IPv6 address.
    IPAddress,
    /// Domain name.
    DomainName,
    /// File.
    File,
    /// Email address.
    EmailAddress,
    /// Phone number.
    PhoneNumber,
    /// Identity.
    Identity,
    /// URL.
    URL,
}

impl EntityTypes {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityTypes::IPAddress => "IPAddress",
            EntityTypes::DomainName => "DomainName",
            EntityTypes::File => "File",
            EntityTypes::EmailAddress => "EmailAddress",
            EntityTypes::PhoneNumber => "PhoneNumber",
            EntityTypes::Identity => "Identity",
            EntityTypes::URL => "URL",
        }
    }
}

impl std::fmt::Display for EntityTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural entity key types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKeyTypes {
    /// String identifying entity.
    String,
    /// File MD5 hash.
    #[serde(rename = "MD5Hash")]
    MD5,
    /// File SHA1 hash.
    #[serde(rename = "SHA1Hash")]
    SHA1,
    /// File SHA256 hash.
    #[serde(rename = "SHA256Hash")]
    SHA256,
    /// Identity identifier in IANA registry.
    IANAID,
    /// Identity identifier in NIC database.
    NICHandle,
}

impl EntityKeyTypes {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKeyTypes::String => "String",
            EntityKeyTypes::MD5 => "MD5Hash",
            EntityKeyTypes::SHA1 => "SHA1Hash",
            EntityKeyTypes::SHA256 => "SHA256Hash",
            EntityKeyTypes::IANAID => "IANAID",
            EntityKeyTypes::NICHandle => "NICHandle",
        }
    }
}

impl std::fmt::Display for EntityKeyTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity attribute names.
///
/// Attribute names keep their PascalCase form in JSON bodies and query
/// params, but URL paths use the kebab-case form (see
/// [`AttributeNames::kebab`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeNames {
    /// Identity class, see [`IdentityClass`]. `Identity` entities.
    Class,
    /// Registration country. `IPAddress` entities.
    RegistrationCountry,
    /// Email address display names. `EmailAddress` entities.
    DisplayNames,
    /// The entity is an indicator of compromise.
    IsIoC,
    /// The entity is trusted.
    IsTrusted,
    /// The entity is malicious.
    IsMalicious,
    /// The domain was generated by algorithm. `DomainName` entities.
    IsDGA,
    /// Domain name is delegated (DNS servers are specified).
    IsDelegated,
    /// Names of the entity. `Identity` and `File` entities.
    Names,
    /// The role of the node in a network, see [`NodeRole`].
    NodeRoles,
    /// Identity industry sector.
    Sectors,
    /// Entity size. `File` entities.
    Size,
    /// Aliases of the malware family.
    MalwareFamilyAliases,
    /// The file belongs to malware classes.
    MalwareClasses,
    /// The file belongs to malware families.
    MalwareFamilies,
    /// The entity relates to malware families.
    RelatedMalwareFamilies,
    /// Domain name or IP address status obtained from Whois.
    Statuses,
    /// Autonomous system number. `IPAddress` entities.
    ASN,
    /// Regional internet registry, see [`RegionalInternetRegistry`].
    RegionalInternetRegistry,
    /// The entity threat category, see [`ThreatCategory`]. `File` entities.
    ThreatCategory,
    /// Threat category the entity has a relationship with.
    RelatedThreatCategory,
    /// The entity malware name. `File` entities.
    MalwareNames,
    /// The entity is used in malicious campaigns.
    Campaigns,
    /// The entity is used by threat actors.
    ThreatActors,
    /// Countries the entity is used in most often.
    AffectedCountries,
    /// Vulnerabilities the entity exploits.
    ExploitedVulnerabilities,
    /// Sectors of activity the entity targets.
    TargetedSectors,
    /// Potential damage, see [`PotentialDamage`].
    PotentialDamage,
    /// Platforms the file operates on. `File` entities.
    Platforms,
    /// Tactics the entity uses.
    Tactics,
    /// Techniques the entity uses.
    Techniques,
}

impl AttributeNames {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeNames::Class => "Class",
            AttributeNames::RegistrationCountry => "RegistrationCountry",
            AttributeNames::DisplayNames => "DisplayNames",
            AttributeNames::IsIoC => "IsIoC",
            AttributeNames::IsTrusted => "IsTrusted",
            AttributeNames::IsMalicious => "IsMalicious",
            AttributeNames::IsDGA => "IsDGA",
            AttributeNames::IsDelegated => "IsDelegated",
            AttributeNames::Names => "Names",
            AttributeNames::NodeRoles => "NodeRoles",
            AttributeNames::Sectors => "Sectors",
            AttributeNames::Size => "Size",
            AttributeNames::MalwareFamilyAliases => "MalwareFamilyAliases",
            AttributeNames::MalwareClasses => "MalwareClasses",
            AttributeNames::MalwareFamilies => "MalwareFamilies",
            AttributeNames::RelatedMalwareFamilies => "RelatedMalwareFamilies",
            AttributeNames::Statuses => "Statuses",
            AttributeNames::ASN => "ASN",
            AttributeNames::RegionalInternetRegistry => "RegionalInternetRegistry",
            AttributeNames::ThreatCategory => "ThreatCategory",
            AttributeNames::RelatedThreatCategory => "RelatedThreatCategory",
            AttributeNames::MalwareNames => "MalwareNames",
            AttributeNames::Campaigns => "Campaigns",
            AttributeNames::ThreatActors => "ThreatActors",
            AttributeNames::AffectedCountries => "AffectedCountries",
            AttributeNames::ExploitedVulnerabilities => "ExploitedVulnerabilities",
            AttributeNames::TargetedSectors => "TargetedSectors",
            AttributeNames::PotentialDamage => "PotentialDamage",
            AttributeNames::Platforms => "Platforms",
            AttributeNames::Tactics => "Tactics",
            AttributeNames::Techniques => "Techniques",
        }
    }

    /// Attribute name as it appears in URL paths, e.g. `IsIoC` → `is-ioc`.
    pub fn kebab(&self) -> &'static str {
        match self {
            AttributeNames::Class => "class",
            AttributeNames::RegistrationCountry => "registration-country",
            AttributeNames::DisplayNames => "display-names",
            AttributeNames::IsIoC => "is-ioc",
            AttributeNames::IsTrusted => "is-trusted",
            AttributeNames::IsMalicious => "is-malicious",
            AttributeNames::IsDGA => "is-dga",
            AttributeNames::IsDelegated => "is-delegated",
            AttributeNames::Names => "names",
            AttributeNames::NodeRoles => "node-roles",
            AttributeNames::Sectors => "sectors",
            AttributeNames::Size => "size",
            AttributeNames::MalwareFamilyAliases => "malware-family-aliases",
            AttributeNames::MalwareClasses => "malware-classes",
            AttributeNames::MalwareFamilies => "malware-families",
            AttributeNames::RelatedMalwareFamilies => "related-malware-families",
            AttributeNames::Statuses => "statuses",
            AttributeNames::ASN => "asn",
            AttributeNames::RegionalInternetRegistry => "regional-internet-registry",
            AttributeNames::ThreatCategory => "threat-category",
            AttributeNames::RelatedThreatCategory => "related-threat-category",
            AttributeNames::MalwareNames => "malware-names",
            AttributeNames::Campaigns => "campaigns",
            AttributeNames::ThreatActors => "threat-actors",
            AttributeNames::AffectedCountries => "affected-countries",
            AttributeNames::ExploitedVulnerabilities => "exploited-vulnerabilities",
            AttributeNames::TargetedSectors => "targeted-sectors",
            AttributeNames::PotentialDamage => "potential-damage",
            AttributeNames::Platforms => "platforms",
            AttributeNames::Tactics => "tactics",
            AttributeNames::Techniques => "techniques",
        }
    }
}

impl std::fmt::Display for AttributeNames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// CnC node.
    CnC,
    /// Tor node of any type.
    TorNode,
    /// Tor exit node.
    TorExitNode,
    /// Proxy server.
    Proxy,
    /// Name server.
    NameServer,
    /// Mail server.
    MailExchanger,
    /// Phishing server.
    Phishing,
    /// Belongs to the DynDNS infrastructure.
    DynDNS,
    /// Belongs to a cloud infrastructure.
    Cloud,
    /// VPN server.
    VPN,
    /// STUN server.
    STUN,
    /// Sinkhole node.
    Sinkhole,
    /// Serves malicious payloads.
    PayloadDelivery,
    /// Used for data exfiltration.
    ExfiltrationStore,
    /// Belongs to a CDN infrastructure.
    CDN,
    /// BitTorrent tracker.
    BitTorrentTracker,
}

/// Identity classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityClass {
    /// A single person.
    Individual,
    /// An informal collection of people, without formal governance.
    Group,
    /// A formal organization of people, with governance.
    Organization,
    /// A class of entities, such as all hospitals, all Europeans etc.
    Class,
}

/// Kind of a relationship between entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKinds {
    Has,
    Contains,
    /// Deprecated.
    BelongsTo,
    ConnectsTo,
    Drops,
    Uses,
    Owns,
    Supports,
    ResolvesTo,
    /// Deprecated.
    VariantOf,
    Hosts,
    Serves,
    Locates,
}

impl RelationshipKinds {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKinds::Has => "Has",
            RelationshipKinds::Contains => "Contains",
            RelationshipKinds::BelongsTo => "BelongsTo",
            RelationshipKinds::ConnectsTo => "ConnectsTo",
            RelationshipKinds::Drops => "Drops",
            RelationshipKinds::Uses => "Uses",
            RelationshipKinds::Owns => "Owns",
            RelationshipKinds::Supports => "Supports",
            RelationshipKinds::ResolvesTo => "ResolvesTo",
            RelationshipKinds::VariantOf => "VariantOf",
            RelationshipKinds::Hosts => "Hosts",
            RelationshipKinds::Serves => "Serves",
            RelationshipKinds::Locates => "Locates",
        }
    }
}

impl std::fmt::Display for RelationshipKinds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity aggregation sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityAggregateSections {
    AssociatedAttributes,
    NaturalAttributes,
    Threat,
    GeoIP,
    Labels,
}

impl EntityAggregateSections {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityAggregateSections::AssociatedAttributes => "AssociatedAttributes",
            EntityAggregateSections::NaturalAttributes => "NaturalAttributes",
            EntityAggregateSections::Threat => "Threat",
            EntityAggregateSections::GeoIP => "GeoIP",
            EntityAggregateSections::Labels => "Labels",
        }
    }
}

impl std::fmt::Display for EntityAggregateSections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threat status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatStatus {
    Unknown,
    Malicious,
    NonMalicious,
}

/// Direction of links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkDirection {
    Forward,
    Reverse,
}

impl LinkDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkDirection::Forward => "Forward",
            LinkDirection::Reverse => "Reverse",
        }
    }
}

impl std::fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regional internet registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionalInternetRegistry {
    RIPE,
    APNIC,
    ARIN,
    AFRINIC,
    LACNIC,
}

/// Threat categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatCategory {
    Clean,
    Riskware,
    Adware,
    Malware,
}

/// Related threat categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatedThreatCategory {
    Riskware,
    Adware,
    Malware,
}

/// Potential damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotentialDamage {
    Low,
    Medium,
    High,
}
