use crate::error::BookingError;

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentMethodOption {
    id: String,
    display_name: String,
    fee: i64,
    expandable: bool,
    // Noneなら利用可能
    disabled_reason: Option<String>,
}

impl PaymentMethodOption {
    pub fn new(id: &str, display_name: &str, fee: i64) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            fee,
            expandable: false,
            disabled_reason: None,
        }
    }

    pub fn expandable(self) -> Self {
        Self {
            expandable: true,
            ..self
        }
    }

    pub fn disabled(self, reason: &str) -> Self {
        Self {
            disabled_reason: Some(reason.to_string()),
            ..self
        }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_display_name(&self) -> &str {
        &self.display_name
    }

    pub fn get_fee(&self) -> i64 {
        self.fee
    }

    pub fn is_expandable(&self) -> bool {
        self.expandable
    }

    pub fn is_enabled(&self) -> bool {
        self.disabled_reason.is_none()
    }

    pub fn get_disabled_reason(&self) -> Option<&str> {
        self.disabled_reason.as_deref()
    }
}

// 並び順は表示順
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PaymentMethodCatalog {
    options: Vec<PaymentMethodOption>,
}

impl PaymentMethodCatalog {
    pub fn new(options: Vec<PaymentMethodOption>) -> Self {
        Self { options }
    }

    pub fn get_options(&self) -> &Vec<PaymentMethodOption> {
        &self.options
    }

    pub fn get_by_id(&self, id: &str) -> Option<&PaymentMethodOption> {
        self.options.iter().find(|option| option.id == id)
    }

    // 先頭の利用可能な支払い方法
    pub fn default_option(&self) -> Option<&PaymentMethodOption> {
        self.options.iter().find(|option| option.is_enabled())
    }

    pub fn find_selectable(&self, id: &str) -> Result<&PaymentMethodOption, BookingError> {
        let option = self
            .get_by_id(id)
            .ok_or_else(|| BookingError::UnknownPaymentMethod(id.to_string()))?;

        match option.get_disabled_reason() {
            None => Ok(option),
            Some(reason) => Err(BookingError::PaymentMethodDisabled {
                name: option.display_name.clone(),
                reason: reason.to_string(),
            }),
        }
    }
}

#[cfg(test)]
fn sample_catalog() -> PaymentMethodCatalog {
    PaymentMethodCatalog::new(vec![
        PaymentMethodOption::new("ovo", "OVO", 3478).disabled("under maintenance"),
        PaymentMethodOption::new("virtual_account", "Virtual Account", 0).expandable(),
        PaymentMethodOption::new("gopay", "GoPay", 4068),
    ])
}

#[test]
fn test_default_option_利用不可の方法は飛ばされること() {
    let catalog = sample_catalog();
    let actual = catalog.default_option().map(|option| option.get_id());

    assert_eq!(actual, Some("virtual_account"));
}

#[test]
fn test_find_selectable_利用不可の方法は異常系() {
    let catalog = sample_catalog();
    let actual = catalog.find_selectable("ovo");

    assert_eq!(
        actual,
        Err(BookingError::PaymentMethodDisabled {
            name: "OVO".to_string(),
            reason: "under maintenance".to_string(),
        })
    );
}

#[test]
fn test_find_selectable_存在しない方法は異常系() {
    let catalog = sample_catalog();

    assert_eq!(
        catalog.find_selectable("paypal"),
        Err(BookingError::UnknownPaymentMethod("paypal".to_string()))
    );
    assert_eq!(
        catalog.find_selectable("gopay").map(|option| option.get_fee()),
        Ok(4068)
    );
}

#[test]
fn test_default_option_全て利用不可ならnone() {
    let catalog = PaymentMethodCatalog::new(vec![
        PaymentMethodOption::new("ovo", "OVO", 3478).disabled("under maintenance"),
    ]);

    assert_eq!(catalog.default_option(), None);
}
