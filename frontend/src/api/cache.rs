//! Client-side query cache shared through a Yew context.
//!
//! Reads go through [`QueryClient::fetch`], which serves entries younger
//! than the stale time and otherwise runs the fetcher and stores its result.
//! Mutations call [`QueryClient::invalidate`] with the family they touched.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use common::query::{QueryCache, QueryFamily, QueryKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use yew::prelude::*;

use crate::api::ApiError;
use crate::helpers::now_ms;

#[derive(Clone, Default)]
pub struct QueryClient {
    cache: Rc<RefCell<QueryCache<serde_json::Value>>>,
}

impl PartialEq for QueryClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }
}

impl QueryClient {
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let cached = self.cache.borrow().get_fresh(&key, now_ms()).cloned();
        if let Some(value) = cached.and_then(|v| serde_json::from_value(v).ok()) {
            return Ok(value);
        }

        let value = fetcher().await?;
        if let Ok(json) = serde_json::to_value(&value) {
            self.cache.borrow_mut().insert(key, json, now_ms());
        }
        Ok(value)
    }

    pub fn invalidate(&self, family: QueryFamily) {
        self.cache.borrow_mut().invalidate(family);
    }

    pub fn invalidate_all(&self, families: &[QueryFamily]) {
        let mut cache = self.cache.borrow_mut();
        for family in families {
            cache.invalidate(*family);
        }
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

/// The client provided by `App`; components mounted outside it get a private one.
pub fn query_client<C: Component>(ctx: &Context<C>) -> QueryClient {
    ctx.link()
        .context::<QueryClient>(Callback::noop())
        .map(|(client, _)| client)
        .unwrap_or_default()
}
