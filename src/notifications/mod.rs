//! Outbound notifications about orders.

pub mod weixin;

pub use weixin::{
    AccessTokenProvider, OrderNotice, ReqwestTemplateMessenger, StaticAccessToken,
    TemplateMessage, TemplateMessenger, WeixinNotifier,
};
