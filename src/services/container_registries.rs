//! Container registries service

use super::integrations::{IntegrationsService, typed_getters};
use crate::models::ContainerRegistryData;
use crate::models::container_registry::{
    AwsEcrData, DockerhubData, GcpGarData, GhcrData, V2RegistryData,
};

pub type ContainerRegistriesService<'a> = IntegrationsService<'a, ContainerRegistryData>;

typed_getters! {
    ContainerRegistryData {
        get_dockerhub => DockerhubData,
        get_ghcr => GhcrData,
        get_v2_registry => V2RegistryData,
        get_aws_ecr => AwsEcrData,
        get_gcp_gar => GcpGarData,
    }
}
