use crate::domain::model::{DispatchOutcome, Identity, NotificationMessage};
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn transport_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn sender(&self) -> &Identity;
    fn recipient(&self) -> &Identity;
    fn dkim_domain(&self) -> Option<&str>;
    fn dkim_selector(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
}

/// 將組好的通知交給外部郵件服務。
///
/// 實作必須把所有失敗轉換成 [`DispatchOutcome`]，不得回傳錯誤或重試。
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, message: &NotificationMessage) -> DispatchOutcome;
}
