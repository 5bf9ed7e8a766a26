use chrono::Utc;
use uuid::Uuid;

use crate::{
    CodeSequence, Collection, Customer, CustomerPatch, NewCustomer, ResultEngine, Scope,
    reports::{self, CustomerListing},
};

use super::{Engine, normalize_optional_text, normalize_required_text};

impl Engine {
    /// Customers visible in `scope`, with their agent's name resolved.
    pub async fn customer_directory(&self, scope: &Scope) -> ResultEngine<Vec<CustomerListing>> {
        let snapshot = self.snapshot().await?;
        Ok(reports::customer_directory(&snapshot, scope))
    }

    /// One customer. A scoped caller can only read its own customers.
    pub async fn customer(&self, id: &str, scope: &Scope) -> ResultEngine<Customer> {
        let customer: Customer = self.record(id).await?;
        scope.ensure_includes(&customer.agent_id)?;
        Ok(customer)
    }

    /// The code the next created customer would receive.
    pub async fn next_customer_code(&self) -> ResultEngine<String> {
        let customers = self.store.get_all(Collection::Customers).await?;
        Ok(CodeSequence::CUSTOMERS.next_for_documents(&customers))
    }

    /// Create a customer with the next free `CUST` code.
    pub async fn create_customer(&self, new: NewCustomer) -> ResultEngine<Customer> {
        let name = normalize_required_text(&new.name, "customer name")?;

        let _guard = self.allocation.lock().await;
        let existing = self.store.get_all(Collection::Customers).await?;
        let customer = Customer {
            id: Uuid::now_v7().to_string(),
            customer_id: CodeSequence::CUSTOMERS.next_for_documents(&existing),
            name,
            email: new.email.trim().to_string(),
            contact: new.contact.trim().to_string(),
            location: new.location.trim().to_string(),
            agent_id: normalize_optional_text(new.agent_id.as_deref()).unwrap_or_default(),
            status: new.status.unwrap_or_default(),
            total_spent: 0.0,
            total_orders: 0,
            created_at: Some(Utc::now()),
            latitude: new.latitude,
            longitude: new.longitude,
        };
        self.store
            .create(
                Collection::Customers,
                &customer.id,
                serde_json::to_value(&customer)?,
            )
            .await?;
        tracing::info!("created customer {} ({})", customer.customer_id, customer.id);
        Ok(customer)
    }

    pub async fn update_customer(&self, id: &str, patch: CustomerPatch) -> ResultEngine<Customer> {
        if let Some(name) = &patch.name {
            normalize_required_text(name, "customer name")?;
        }
        let partial = serde_json::to_value(&patch)?;
        self.store.update(Collection::Customers, id, partial).await?;
        self.record(id).await
    }

    /// Hard delete. Orders keep pointing at the removed key.
    pub async fn delete_customer(&self, id: &str) -> ResultEngine<()> {
        self.store.delete(Collection::Customers, id).await?;
        tracing::info!("deleted customer {id}");
        Ok(())
    }
}
