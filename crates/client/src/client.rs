use crate::TransportHandle;
use crate::paginate::{ResultStream, paginate};
use crate::query::{GraphParams, RmParams};
use crate::transport::Request;
use cirrus_models::azure::{Group, Group365, NetworkSecurityGroup, O365Group, Subscription, Tenant, User};
use cirrus_models::azure::VirtualMachineScaleSet;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Page size requested when a listing doesn't specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 99;

const GRAPH_API_VERSION: &str = "v1.0";
const GRAPH_API_BETA_VERSION: &str = "beta";
const SUBSCRIPTIONS_API_VERSION: &str = "2020-01-01";
const NETWORK_API_VERSION: &str = "2024-03-01";
const COMPUTE_API_VERSION: &str = "2022-08-01";

/// Every listing the collector knows how to make.
///
/// Holds one transport per API family and the tenant the run is collecting
/// from. Cheap to clone; clones share transports.
///
/// Each listing returns a [`ResultStream`] driven by [`paginate`]. Directory
/// listings fill in the configured page size when `params.top` is `0`.
#[derive(Clone)]
pub struct Client {
    graph: TransportHandle,
    resource_manager: TransportHandle,
    tenant: Arc<Tenant>,
    page_size: u32,
}

impl Client {
    pub fn new(graph: TransportHandle, resource_manager: TransportHandle, tenant: Tenant) -> Self {
        Self {
            graph,
            resource_manager,
            tenant: Arc::new(tenant),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size used when a listing doesn't specify one. `0`
    /// restores [`DEFAULT_PAGE_SIZE`].
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
        self
    }

    /// The tenant being collected. Read-only for the whole run.
    pub fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn graph<T>(&self, token: &CancellationToken, path: String, params: GraphParams) -> ResultStream<T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let params = params.or_top(self.page_size);
        paginate(self.graph.clone(), token.clone(), Request::new(path, &params))
    }

    fn resource_manager<T>(&self, token: &CancellationToken, path: String, params: RmParams) -> ResultStream<T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        paginate(self.resource_manager.clone(), token.clone(), Request::new(path, &params))
    }

    pub fn list_groups365(&self, token: &CancellationToken, params: GraphParams) -> ResultStream<Group365> {
        self.graph(token, format!("/{GRAPH_API_VERSION}/groups"), params)
    }

    pub fn list_group365_members(
        &self,
        token: &CancellationToken,
        group_id: &str,
        params: GraphParams,
    ) -> ResultStream<Value> {
        self.graph(token, format!("/{GRAPH_API_BETA_VERSION}/groups/{group_id}/members"), params)
    }

    pub fn list_group365_owners(
        &self,
        token: &CancellationToken,
        group_id: &str,
        params: GraphParams,
    ) -> ResultStream<Value> {
        self.graph(token, format!("/{GRAPH_API_BETA_VERSION}/groups/{group_id}/owners"), params)
    }

    /// Direct members of one group. Non-user members (devices, service
    /// principals, nested groups) are filtered out server-side.
    pub fn list_group_members(&self, token: &CancellationToken, group_id: &str, params: GraphParams) -> ResultStream<User> {
        self.graph(token, format!("/{GRAPH_API_VERSION}/groups/{group_id}/members/microsoft.graph.user"), params)
    }

    /// Domains registered to the tenant, listed as Office 365 groups.
    pub fn list_o365_groups(&self, token: &CancellationToken, params: GraphParams) -> ResultStream<O365Group> {
        self.graph(token, format!("/{GRAPH_API_VERSION}/domains"), params)
    }

    pub fn list_users(&self, token: &CancellationToken, params: GraphParams) -> ResultStream<User> {
        self.graph(token, format!("/{GRAPH_API_VERSION}/users"), params)
    }

    /// Groups a user is a direct member of.
    pub fn list_groups_of_member(
        &self,
        token: &CancellationToken,
        user_id: &str,
        params: GraphParams,
    ) -> ResultStream<Group> {
        self.graph(token, format!("/{GRAPH_API_VERSION}/users/{user_id}/memberOf/microsoft.graph.group"), params)
    }

    /// People a user interacts with the most, most relevant first.
    pub fn list_user_interactions(
        &self,
        token: &CancellationToken,
        user_id: &str,
        params: GraphParams,
    ) -> ResultStream<Value> {
        self.graph(token, format!("/{GRAPH_API_VERSION}/users/{user_id}/people"), params)
    }

    pub fn list_subscriptions(&self, token: &CancellationToken) -> ResultStream<Subscription> {
        self.resource_manager(token, "/subscriptions".to_string(), RmParams::new(SUBSCRIPTIONS_API_VERSION))
    }

    pub fn list_network_security_groups(
        &self,
        token: &CancellationToken,
        subscription_id: &str,
    ) -> ResultStream<NetworkSecurityGroup> {
        self.resource_manager(
            token,
            format!("/subscriptions/{subscription_id}/providers/Microsoft.Network/networkSecurityGroups"),
            RmParams::new(NETWORK_API_VERSION),
        )
    }

    pub fn list_vm_scale_sets(
        &self,
        token: &CancellationToken,
        subscription_id: &str,
    ) -> ResultStream<VirtualMachineScaleSet> {
        self.resource_manager(
            token,
            format!("/subscriptions/{subscription_id}/providers/Microsoft.Compute/virtualMachineScaleSets"),
            RmParams::new(COMPUTE_API_VERSION),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockTransport, page};
    use futures::StreamExt;
    use serde_json::json;

    fn client(graph: MockTransport, resource_manager: MockTransport) -> Client {
        Client::new(Arc::new(graph), Arc::new(resource_manager), Tenant::new("t-1", "Contoso"))
    }

    #[tokio::test]
    async fn test_zero_top_gets_default_page_size() {
        let graph = Arc::new(MockTransport::default().with_page("/v1.0/users", page([json!({"id": "u-1"})], None)));
        let client = Client::new(graph.clone(), Arc::new(MockTransport::default()), Tenant::default());
        let users: Vec<_> = client.list_users(&CancellationToken::new(), GraphParams::default()).collect().await;
        assert_eq!(users.len(), 1);
        assert_eq!(graph.requests()[0].query, vec![("$top".to_string(), "99".to_string())]);
    }

    #[tokio::test]
    async fn test_configured_page_size_and_explicit_top() {
        let graph = Arc::new(MockTransport::default().with_page("/v1.0/users", page([], None)));
        let client =
            Client::new(graph.clone(), Arc::new(MockTransport::default()), Tenant::default()).with_page_size(250);
        let token = CancellationToken::new();
        let _: Vec<_> = client.list_users(&token, GraphParams::default()).collect().await;
        let _: Vec<_> = client.list_users(&token, GraphParams::default().with_top(5)).collect().await;
        let tops: Vec<_> = graph.requests().into_iter().map(|r| r.query).collect();
        assert_eq!(tops[0], vec![("$top".to_string(), "250".to_string())]);
        assert_eq!(tops[1], vec![("$top".to_string(), "5".to_string())]);
    }

    #[test]
    fn test_zero_page_size_override_restores_default() {
        let client = client(MockTransport::default(), MockTransport::default()).with_page_size(0);
        assert_eq!(client.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_resource_listings_use_resource_manager() {
        let resource_manager = Arc::new(MockTransport::default().with_page(
            "/subscriptions/s-1/providers/Microsoft.Network/networkSecurityGroups",
            json!({"value": [{"id": "/nsg/1", "name": "web"}], "nextLink": "https://rm/nsg?page=2"}),
        ).with_page("https://rm/nsg?page=2", json!({"value": [{"id": "/nsg/2"}]})));
        let client = Client::new(Arc::new(MockTransport::default()), resource_manager.clone(), Tenant::default());
        let nsgs: Vec<_> = client.list_network_security_groups(&CancellationToken::new(), "s-1").collect().await;
        let ids: Vec<_> = nsgs.into_iter().map(|n| n.unwrap().id).collect();
        assert_eq!(ids, vec!["/nsg/1", "/nsg/2"]);
        let first = &resource_manager.requests()[0];
        assert_eq!(first.query, vec![("api-version".to_string(), "2024-03-01".to_string())]);
    }

    #[tokio::test]
    async fn test_o365_groups_are_listed_from_domains() {
        let graph = Arc::new(MockTransport::default().with_page(
            "/v1.0/domains",
            page([json!({"id": "contoso.com", "isVerified": true}), json!({"id": "fabrikam.com"})], None),
        ));
        let client = Client::new(graph.clone(), Arc::new(MockTransport::default()), Tenant::default());
        let params = GraphParams::default().with_select(["id", "isVerified"]);
        let groups: Vec<_> = client.list_o365_groups(&CancellationToken::new(), params).collect().await;
        let ids: Vec<_> = groups.into_iter().map(|g| g.unwrap().id).collect();
        assert_eq!(ids, vec!["contoso.com", "fabrikam.com"]);
        assert_eq!(
            graph.requests()[0].query,
            vec![("$select".to_string(), "id,isVerified".to_string()), ("$top".to_string(), "99".to_string())]
        );
    }

    #[test]
    fn test_tenant_is_exposed() {
        let client = client(MockTransport::default(), MockTransport::default());
        assert_eq!(client.tenant().tenant_id, "t-1");
        assert_eq!(client.tenant().display_name, "Contoso");
    }
}
