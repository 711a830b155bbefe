//! Declares which specification capabilities a generator supports.
//!
//! A [`FeatureSet`] is pure data: host validators consult it before a run to
//! decide whether a specification uses constructs the generator cannot emit.

use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DocumentationFeature {
    Readme,
    Model,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WireFormatFeature {
    Json,
    Xml,
    Protobuf,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SecurityFeature {
    BasicAuth,
    BearerToken,
    ApiKey,
    OAuth2Implicit,
    OAuth2Password,
    OAuth2ClientCredentials,
    OAuth2AuthorizationCode,
    OpenIdConnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GlobalFeature {
    Info,
    Host,
    BasePath,
    Schemes,
    PartialSchemes,
    Consumes,
    Produces,
    ExternalDocumentation,
    Examples,
    XmlStructureDefinitions,
    MultiServer,
    ParameterizedServer,
    ParameterStyling,
    Callbacks,
    LinkObjects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SchemaSupportFeature {
    Simple,
    Composite,
    Polymorphism,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ParameterFeature {
    Path,
    Query,
    Header,
    Body,
    FormUnencoded,
    FormMultipart,
    Cookie,
}

/// A single capability of any category, as reported by a host validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    Documentation(DocumentationFeature),
    WireFormat(WireFormatFeature),
    Security(SecurityFeature),
    Global(GlobalFeature),
    SchemaSupport(SchemaSupportFeature),
    Parameter(ParameterFeature),
}

/// Capabilities a generator declares. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    pub documentation: BTreeSet<DocumentationFeature>,
    pub wire_formats: BTreeSet<WireFormatFeature>,
    pub security: BTreeSet<SecurityFeature>,
    pub global: BTreeSet<GlobalFeature>,
    pub schema_support: BTreeSet<SchemaSupportFeature>,
    pub parameters: BTreeSet<ParameterFeature>,
}

impl FeatureSet {
    /// What the generator toolkit supports before a generator narrows or widens it.
    pub fn toolkit_default() -> Self {
        use GlobalFeature::*;
        Self {
            documentation: BTreeSet::from([DocumentationFeature::Readme]),
            wire_formats: BTreeSet::from([WireFormatFeature::Json, WireFormatFeature::Xml]),
            security: BTreeSet::from([
                SecurityFeature::BasicAuth,
                SecurityFeature::ApiKey,
                SecurityFeature::OAuth2Implicit,
            ]),
            global: BTreeSet::from([
                Info,
                Host,
                BasePath,
                Schemes,
                PartialSchemes,
                Consumes,
                Produces,
                ExternalDocumentation,
                Examples,
                XmlStructureDefinitions,
                MultiServer,
                ParameterizedServer,
                ParameterStyling,
                Callbacks,
                LinkObjects,
            ]),
            schema_support: BTreeSet::from([
                SchemaSupportFeature::Simple,
                SchemaSupportFeature::Composite,
                SchemaSupportFeature::Polymorphism,
                SchemaSupportFeature::Union,
            ]),
            parameters: BTreeSet::from([
                ParameterFeature::Path,
                ParameterFeature::Query,
                ParameterFeature::Header,
                ParameterFeature::Body,
                ParameterFeature::FormUnencoded,
                ParameterFeature::FormMultipart,
            ]),
        }
    }

    pub fn include_documentation<I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = DocumentationFeature>,
    {
        self.documentation.extend(features);
        self
    }

    /// Replace the accepted wire formats.
    pub fn wire_formats<I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = WireFormatFeature>,
    {
        self.wire_formats = features.into_iter().collect();
        self
    }

    /// Replace the accepted security schemes.
    pub fn security<I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = SecurityFeature>,
    {
        self.security = features.into_iter().collect();
        self
    }

    pub fn exclude_global<I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = GlobalFeature>,
    {
        for f in features {
            self.global.remove(&f);
        }
        self
    }

    pub fn exclude_schema_support<I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = SchemaSupportFeature>,
    {
        for f in features {
            self.schema_support.remove(&f);
        }
        self
    }

    pub fn include_parameters<I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = ParameterFeature>,
    {
        self.parameters.extend(features);
        self
    }

    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::Documentation(f) => self.documentation.contains(&f),
            Feature::WireFormat(f) => self.wire_formats.contains(&f),
            Feature::Security(f) => self.security.contains(&f),
            Feature::Global(f) => self.global.contains(&f),
            Feature::SchemaSupport(f) => self.schema_support.contains(&f),
            Feature::Parameter(f) => self.parameters.contains(&f),
        }
    }

    /// The subset of `used` this generator does not support, in input order.
    pub fn unsupported(&self, used: &[Feature]) -> Vec<Feature> {
        used.iter().copied().filter(|f| !self.supports(*f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_adjusts_default() {
        let set = FeatureSet::toolkit_default()
            .include_documentation([DocumentationFeature::Api])
            .wire_formats([WireFormatFeature::Json])
            .exclude_global([GlobalFeature::Callbacks])
            .include_parameters([ParameterFeature::Cookie]);

        assert!(set.supports(Feature::Documentation(DocumentationFeature::Readme)));
        assert!(set.supports(Feature::Documentation(DocumentationFeature::Api)));
        assert!(!set.supports(Feature::WireFormat(WireFormatFeature::Xml)));
        assert!(!set.supports(Feature::Global(GlobalFeature::Callbacks)));
        assert!(set.supports(Feature::Global(GlobalFeature::LinkObjects)));
        assert!(set.supports(Feature::Parameter(ParameterFeature::Cookie)));
    }

    #[test]
    fn test_unsupported_preserves_order() {
        let set = FeatureSet::toolkit_default().security([SecurityFeature::ApiKey]);
        let used = [
            Feature::Security(SecurityFeature::BearerToken),
            Feature::Security(SecurityFeature::ApiKey),
            Feature::WireFormat(WireFormatFeature::Protobuf),
        ];
        assert_eq!(
            set.unsupported(&used),
            vec![
                Feature::Security(SecurityFeature::BearerToken),
                Feature::WireFormat(WireFormatFeature::Protobuf),
            ]
        );
    }

    #[test]
    fn test_serializes() {
        let json = serde_json::to_value(FeatureSet::toolkit_default()).unwrap();
        assert_eq!(json["documentation"], serde_json::json!(["Readme"]));
    }
}
