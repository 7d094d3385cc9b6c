//! WeChat template messages for new and paid orders.
//!
//! Admins are told about new orders through the official-account template
//! API, customers get a payment receipt through the mini-program API.

use crate::{config::WeixinConfig, errors::ServiceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const OFFICIAL_ACCOUNT_PATH: &str = "/cgi-bin/message/template/send";
const MINI_PROGRAM_PATH: &str = "/cgi-bin/message/wxopen/template/send";

const REFUND_POLICY: &str =
    "您已拼团成功，如需退款，请务必在截单前申请退款，截单后不予退款，谢谢理解";

/// How an order was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Paid from a member's stored-value card
    StoredValueCard,
    Weixin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryWay {
    Pickup,
    Express,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub delivery_way: DeliveryWay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub amount: i32,
}

/// Member who placed the order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub nickname: String,
    pub name: String,
    pub phone: String,
}

/// The order facts rendered into template messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNotice {
    pub code: String,
    /// Group-buy number, zero when the order is not part of a group
    pub index: i32,
    /// Total in cents
    pub cost: i32,
    pub items: Vec<OrderLine>,
    pub payer: Payer,
    pub payment: PaymentKind,
    pub paid: bool,
    pub note: Option<String>,
    pub address: DeliveryAddress,
    /// Mini-program openid of the customer
    pub openid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateField {
    pub value: String,
}

pub type TemplateData = BTreeMap<String, TemplateField>;

fn field(value: impl Into<String>) -> TemplateField {
    TemplateField {
        value: value.into(),
    }
}

fn yuan(cents: i32) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("￥{sign}{}.{:02}", cents / 100, cents % 100)
}

fn items_line(items: &[OrderLine]) -> String {
    items
        .iter()
        .map(|item| format!("{}x{}", item.name, item.amount))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Data block of the admin "new order" template
pub fn admin_template(notice: &OrderNotice) -> TemplateData {
    let first = if notice.index != 0 {
        format!("拼团编号: {}", notice.index)
    } else {
        notice.code.clone()
    };

    let payment = match (notice.payment, notice.paid) {
        (PaymentKind::StoredValueCard, _) => format!(
            "储值卡支付，会员: {}[{}]",
            notice.payer.name, notice.payer.phone
        ),
        (PaymentKind::Weixin, true) => "微信已支付".to_string(),
        (PaymentKind::Weixin, false) => "微信未支付".to_string(),
    };

    let address = &notice.address;
    let remark = match address.delivery_way {
        DeliveryWay::Express => format!(
            "送货地址: {}[{}]{}",
            address.name, address.phone, address.address
        ),
        DeliveryWay::Pickup => format!("取货地址: {}", address.address),
    };

    BTreeMap::from([
        ("first".to_string(), field(first)),
        ("keyword1".to_string(), field(items_line(&notice.items))),
        ("keyword2".to_string(), field(yuan(notice.cost))),
        ("keyword3".to_string(), field(notice.payer.nickname.clone())),
        ("keyword4".to_string(), field(payment)),
        (
            "keyword5".to_string(),
            field(notice.note.clone().unwrap_or_default()),
        ),
        ("remark".to_string(), field(remark)),
    ])
}

/// Data block of the customer "payment received" template
pub fn customer_template(notice: &OrderNotice, service_phone: Option<&str>) -> TemplateData {
    let address = &notice.address;
    let delivery = match address.delivery_way {
        DeliveryWay::Pickup => "自提",
        DeliveryWay::Express => "快递",
    };
    let hotline = match service_phone {
        Some(phone) => format!("如有疑问，可以拨打客服电话: {phone}"),
        None => "如有疑问，请联系客服".to_string(),
    };

    let values = [
        notice.index.to_string(),
        notice.code.clone(),
        yuan(notice.cost),
        items_line(&notice.items),
        delivery.to_string(),
        format!("{}-{}", address.name, address.phone),
        address.address.clone(),
        REFUND_POLICY.to_string(),
        notice.note.clone().unwrap_or_default(),
        hotline,
    ];

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| (format!("keyword{}", i + 1), field(value)))
        .collect()
}

/// Which WeChat API a message goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateChannel {
    OfficialAccount,
    MiniProgram,
}

impl TemplateChannel {
    fn path(self) -> &'static str {
        match self {
            TemplateChannel::OfficialAccount => OFFICIAL_ACCOUNT_PATH,
            TemplateChannel::MiniProgram => MINI_PROGRAM_PATH,
        }
    }
}

/// Request body of the template send APIs
#[derive(Debug, Clone, Serialize)]
pub struct TemplateMessage {
    #[serde(skip)]
    pub channel: TemplateChannel,
    pub touser: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis_keyword: Option<String>,
    pub data: TemplateData,
}

#[derive(Debug, Deserialize)]
struct WeixinReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Delivers one template message
#[async_trait]
pub trait TemplateMessenger: Send + Sync {
    async fn send(&self, access_token: &str, message: &TemplateMessage)
        -> Result<(), ServiceError>;
}

/// Supplies the access token of the shop's WeChat account
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// `None` when no token is available and sending should be skipped
    async fn access_token(&self) -> Result<Option<String>, ServiceError>;
}

/// Token taken verbatim from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticAccessToken(Option<String>);

impl StaticAccessToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }
}

#[async_trait]
impl AccessTokenProvider for StaticAccessToken {
    async fn access_token(&self) -> Result<Option<String>, ServiceError> {
        Ok(self.0.clone())
    }
}

/// Template messenger backed by `reqwest`
#[derive(Clone)]
pub struct ReqwestTemplateMessenger {
    client: reqwest::Client,
    api_base: String,
}

impl ReqwestTemplateMessenger {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InternalError(format!("weixin client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TemplateMessenger for ReqwestTemplateMessenger {
    #[instrument(skip(self, access_token, message), fields(touser = %message.touser))]
    async fn send(
        &self,
        access_token: &str,
        message: &TemplateMessage,
    ) -> Result<(), ServiceError> {
        let url = format!("{}{}", self.api_base, message.channel.path());

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", access_token)])
            .json(message)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("weixin request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "weixin responded with status {status}"
            )));
        }

        let reply: WeixinReply = response
            .json()
            .await
            .map_err(|e| ServiceError::SerializationError(format!("weixin reply: {e}")))?;
        debug!(errcode = reply.errcode, errmsg = %reply.errmsg, "weixin reply");

        if reply.errcode != 0 {
            return Err(ServiceError::ExternalServiceError(format!(
                "weixin errcode {}: {}",
                reply.errcode, reply.errmsg
            )));
        }
        Ok(())
    }
}

/// Sends order notices to shop admins and customers
#[derive(Clone)]
pub struct WeixinNotifier {
    messenger: Arc<dyn TemplateMessenger>,
    tokens: Arc<dyn AccessTokenProvider>,
    config: WeixinConfig,
}

impl WeixinNotifier {
    pub fn new(
        messenger: Arc<dyn TemplateMessenger>,
        tokens: Arc<dyn AccessTokenProvider>,
        config: WeixinConfig,
    ) -> Self {
        Self {
            messenger,
            tokens,
            config,
        }
    }

    /// Notifier talking to the configured API with the configured token
    pub fn from_config(config: &WeixinConfig) -> Result<Self, ServiceError> {
        let messenger =
            ReqwestTemplateMessenger::new(&config.api_base, Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(
            Arc::new(messenger),
            Arc::new(StaticAccessToken::new(config.access_token.clone())),
            config.clone(),
        ))
    }

    /// Tells every configured admin about a new order.
    ///
    /// Returns how many admins were notified. A failed send is logged and
    /// does not stop the remaining ones.
    #[instrument(skip(self, notice), fields(order = %notice.code))]
    pub async fn notify_admins(&self, notice: &OrderNotice) -> Result<usize, ServiceError> {
        let recipients = self.config.admin_recipients();
        if recipients.is_empty() {
            info!("no weixin admin recipients configured, skipping notice");
            return Ok(0);
        }
        let Some(token) = self.tokens.access_token().await? else {
            warn!("no weixin access token available, skipping admin notice");
            return Ok(0);
        };

        let data = admin_template(notice);
        let mut delivered = 0;
        for openid in recipients {
            let message = TemplateMessage {
                channel: TemplateChannel::OfficialAccount,
                touser: openid.clone(),
                template_id: self.config.admin_template_id.clone(),
                url: self.config.admin_url.clone(),
                form_id: None,
                emphasis_keyword: None,
                data: data.clone(),
            };

            match self.messenger.send(&token, &message).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(%openid, error = %e, "failed to notify admin"),
            }
        }

        info!(delivered, "admin order notices sent");
        Ok(delivered)
    }

    /// Sends the payment receipt to the customer who placed the order
    #[instrument(skip(self, notice, form_id), fields(order = %notice.code))]
    pub async fn notify_customer(
        &self,
        notice: &OrderNotice,
        form_id: &str,
    ) -> Result<(), ServiceError> {
        let Some(token) = self.tokens.access_token().await? else {
            warn!("no weixin access token available, skipping customer notice");
            return Ok(());
        };

        let message = TemplateMessage {
            channel: TemplateChannel::MiniProgram,
            touser: notice.openid.clone(),
            template_id: self.config.customer_template_id.clone(),
            url: None,
            form_id: Some(form_id.to_string()),
            emphasis_keyword: Some(self.config.customer_emphasis_keyword.clone()),
            data: customer_template(notice, self.config.service_phone.as_deref()),
        };

        self.messenger.send(&token, &message).await?;
        info!("customer payment notice sent");
        Ok(())
    }
}
