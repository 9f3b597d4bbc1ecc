use std::collections::HashMap;

use super::{Backend, Endpoint, FetchError, Request, Response};

/// Endpoints whose cached reads go stale when an approval changes.
const APPROVAL_DEPENDENTS: &[Endpoint] = &[
    Endpoint::PaginatedTransactions,
    Endpoint::TransactionsByEmployee,
];

/// Memoizes successful reads by `endpoint + params`.
pub(crate) struct CachedBackend<B> {
    inner: B,
    cache: HashMap<String, Response>,
}

impl<B: Backend> CachedBackend<B> {
    pub(crate) fn new(inner: B) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    pub(crate) fn fetch_with_cache(&mut self, request: &Request) -> Result<Response, FetchError> {
        let key = request.cache_key();
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!(%key, "cache hit");
            return Ok(hit.clone());
        }
        let response = self.inner.call(request)?;
        self.cache.insert(key, response.clone());
        Ok(response)
    }

    pub(crate) fn fetch_without_cache(
        &mut self,
        request: &Request,
    ) -> Result<Response, FetchError> {
        self.inner.call(request)
    }

    pub(crate) fn clear_cache_by_endpoint(&mut self, endpoints: &[Endpoint]) {
        self.cache.retain(|key, _| {
            !endpoints
                .iter()
                .any(|endpoint| key.starts_with(endpoint.as_str()))
        });
    }

    #[cfg(test)]
    pub(crate) fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl<B: Backend> Backend for CachedBackend<B> {
    fn call(&mut self, request: &Request) -> Result<Response, FetchError> {
        if request.is_read() {
            return self.fetch_with_cache(request);
        }
        let response = self.fetch_without_cache(request)?;
        if request.endpoint() == Endpoint::SetTransactionApproval {
            self.clear_cache_by_endpoint(APPROVAL_DEPENDENTS);
        }
        Ok(response)
    }

    fn clear_cache(&mut self) {
        tracing::debug!(entries = self.cache.len(), "clearing request cache");
        self.cache.clear();
    }
}
