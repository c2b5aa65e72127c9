//! 链接凭证校验
//!
//! `/stats/{link_id}` 与 `/export/{link_id}/csv` 只对持有
//! `access_<link_id>=true` 的客户端开放，其余请求重定向到 `/`。

use actix_service::{Service, Transform};
use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::errors::LinkTrackerError;

/// 受保护路由必须声明的路径参数
pub const LINK_ID_PARAM: &str = "link_id";

/// 授权的 cookie 值
pub const ACCESS_GRANTED: &str = "true";

/// 链接凭证 cookie 的名称
pub fn access_cookie_name(link_id: &str) -> String {
    format!("access_{}", link_id)
}

/// 仅当 cookie 值恰好为 "true" 时放行
pub fn authorize(link_id: &str, credential: Option<&str>) -> bool {
    !link_id.is_empty() && credential == Some(ACCESS_GRANTED)
}

/// 中间件工厂，包裹路径含 `{link_id}` 的 `web::resource`
#[derive(Clone, Default)]
pub struct LinkAccessGuard;

impl<S, B> Transform<S, ServiceRequest> for LinkAccessGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = LinkAccessGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LinkAccessGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct LinkAccessGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for LinkAccessGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            let link_id = req
                .match_info()
                .get(LINK_ID_PARAM)
                .unwrap_or_default()
                .to_string();
            let cookie = req.cookie(&access_cookie_name(&link_id));

            if !authorize(&link_id, cookie.as_ref().map(|c| c.value())) {
                let err = LinkTrackerError::missing_credential(access_cookie_name(&link_id));
                debug!("Access denied on {}: {}", req.path(), err);
                return Ok(req.into_response(err.error_response().map_into_right_body()));
            }

            trace!("Access granted for {}", link_id);
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}
