//! Shared service for integration families
//!
//! Alert channels, cloud accounts and container registries expose the same
//! verbs over [`Integration`] envelopes; only the payload family differs.

use std::marker::PhantomData;

use crate::client::{Crud, Endpoint, LaceworkClient};
use crate::error::Result;
use crate::models::{Integration, IntegrationPayload};

/// CRUD over one integration family `F`
pub struct IntegrationsService<'a, F> {
    crud: Crud<'a>,
    family: PhantomData<fn() -> F>,
}

impl<'a, F: IntegrationPayload> IntegrationsService<'a, F> {
    pub(crate) fn new(client: &'a LaceworkClient, endpoint: Endpoint) -> Self {
        Self {
            crud: Crud::new(client, endpoint),
            family: PhantomData,
        }
    }

    pub(crate) fn crud(&self) -> &Crud<'a> {
        &self.crud
    }

    /// All integrations of the family, sub-types mixed
    pub async fn list(&self) -> Result<Vec<Integration<F>>> {
        self.crud.list().await
    }

    pub async fn get(&self, guid: &str) -> Result<Integration<F>> {
        self.crud.get(guid).await
    }

    /// Get an integration decoded as the concrete payload `P`.
    ///
    /// Fails with a decode error if the integration is of another sub-type.
    pub async fn get_as<P: IntegrationPayload>(&self, guid: &str) -> Result<Integration<P>> {
        self.crud.get(guid).await
    }

    pub async fn create<P: IntegrationPayload>(
        &self,
        integration: &Integration<P>,
    ) -> Result<Integration<P>> {
        self.crud.create(integration).await
    }

    /// Update the integration identified by its own `intgGuid`
    pub async fn update<P: IntegrationPayload>(
        &self,
        integration: &Integration<P>,
    ) -> Result<Integration<P>> {
        self.crud.update(integration.id(), integration).await
    }

    pub async fn delete(&self, guid: &str) -> Result<()> {
        self.crud.delete(guid).await
    }
}

/// Typed `get_*` wrappers for the payload structs of one family
macro_rules! typed_getters {
    ( $family:ty { $( $name:ident => $payload:ty, )+ } ) => {
        impl $crate::services::IntegrationsService<'_, $family> {
            $(
                pub async fn $name(
                    &self,
                    guid: &str,
                ) -> $crate::error::Result<$crate::models::Integration<$payload>> {
                    self.get_as(guid).await
                }
            )+
        }
    };
}

pub(crate) use typed_getters;
