use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ServiceError;
use crate::database::models::{NewProposal, Proposal};
use crate::database::Store;

#[derive(Clone)]
pub struct ProposalService {
    store: Arc<dyn Store>,
}

impl ProposalService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Proposal>, ServiceError> {
        Ok(self.store.list_proposals().await?)
    }

    /// An unknown customer simply has no proposals.
    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Proposal>, ServiceError> {
        Ok(self.store.list_proposals_by_customer(customer_id).await?)
    }

    /// Record a proposal on an available listing.
    pub async fn create(&self, proposal: NewProposal) -> Result<Proposal, ServiceError> {
        if self.store.find_customer(proposal.customer_id).await?.is_none() {
            return Err(ServiceError::NotFound("Cliente não encontrado".to_string()));
        }

        let property = self
            .store
            .find_property(proposal.property_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Imóvel {} não encontrado", proposal.property_id)))?;
        if !property.available {
            return Err(ServiceError::Conflict("Imóvel indisponível para propostas".to_string()));
        }

        let created = self.store.create_proposal(proposal).await?;
        info!(
            "Proposal {} on property {} by customer {}",
            created.id, created.property_id, created.customer_id
        );
        Ok(created)
    }

    pub async fn reply(&self, id: i32, reply: &str) -> Result<Proposal, ServiceError> {
        let answered = self
            .store
            .reply_to_proposal(id, reply)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Proposta {} não encontrada", id)))?;

        info!("Proposal {} answered", id);
        Ok(answered)
    }
}
