//! # 리소스 정의
//!
//! 라우트 모듈 하나가 다루는 리소스(카테고리, 상품, 주문 등)를 선언적으로 기술합니다.
//! 일반 CRUD 핸들러(`crud`)는 이 정의만 보고 동작합니다.
//!
//! | 접두사 | 컬렉션 | 필수 필드 |
//! |--------|--------|-----------|
//! | /categories | categories | name |
//! | /subCategories | subcategories | name, categoryId |
//! | /brands | brands | name, subcategoryId |
//! | /variantTypes | varianttypes | name, type |
//! | /variants | variants | name, variantTypeId |
//! | /products | products | name, quantity, price, proCategoryId, proSubCategoryId |
//! | /couponCodes | couponcodes | couponCode, discountType, discountAmount, endDate |
//! | /posters | posters | posterName |
//! | /users | users | name, password |
//! | /orders | orders | userID, items, totalPrice, shippingAddress, paymentMethod |
//! | /payment | payments | orderId, amount, paymentMethod |
//! | /notification | notifications | title, description |

use crate::error::AppError;
use crate::models::PRODUCT_COLLECTION;
use crate::routes::products::validate_images;
use serde_json::{Map, Value};

/// 본문 추가 검증 함수
pub type Validator = fn(&Map<String, Value>) -> Result<(), AppError>;

/// 일반 CRUD 핸들러 중 어떤 것을 노출할지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub list: bool,
    pub get: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const ALL: Self = Self {
        list: true,
        get: true,
        create: true,
        update: true,
        delete: true,
    };
}

/// 리소스 하나의 정의
#[derive(Debug)]
pub struct Resource {
    /// 메시지에 쓰는 단수형 이름 (예: "Category")
    pub singular: &'static str,
    /// 메시지에 쓰는 복수형 이름 (예: "Categories")
    pub plural: &'static str,
    /// 문서 저장소의 컬렉션 이름
    pub collection: &'static str,
    pub capabilities: Capabilities,
    /// 생성 시 반드시 있어야 하고, 수정 시 비울 수 없는 필드
    pub required: &'static [&'static str],
    /// 생성 시 값이 없으면 채워 넣는 문자열 기본값
    pub defaults: &'static [(&'static str, &'static str)],
    /// 응답에서 제거하는 필드
    pub hidden: &'static [&'static str],
    pub validate: Option<Validator>,
}

impl Resource {
    const fn new(
        singular: &'static str,
        plural: &'static str,
        collection: &'static str,
        required: &'static [&'static str],
    ) -> Self {
        Self {
            singular,
            plural,
            collection,
            capabilities: Capabilities::ALL,
            required,
            defaults: &[],
            hidden: &[],
            validate: None,
        }
    }

    pub fn not_found(&self) -> AppError {
        AppError::NotFound(format!("{} not found.", self.singular))
    }
}

pub static CATEGORIES: Resource = Resource::new("Category", "Categories", "categories", &["name"]);

pub static SUB_CATEGORIES: Resource = Resource::new(
    "Sub-category",
    "Sub-categories",
    "subcategories",
    &["name", "categoryId"],
);

pub static BRANDS: Resource = Resource::new("Brand", "Brands", "brands", &["name", "subcategoryId"]);

pub static VARIANT_TYPES: Resource = Resource::new(
    "Variant type",
    "Variant types",
    "varianttypes",
    &["name", "type"],
);

pub static VARIANTS: Resource =
    Resource::new("Variant", "Variants", "variants", &["name", "variantTypeId"]);

pub static PRODUCTS: Resource = Resource {
    validate: Some(validate_images),
    ..Resource::new(
        "Product",
        "Products",
        PRODUCT_COLLECTION,
        &["name", "quantity", "price", "proCategoryId", "proSubCategoryId"],
    )
};

pub static COUPON_CODES: Resource = Resource {
    defaults: &[("status", "active")],
    ..Resource::new(
        "Coupon",
        "Coupons",
        "couponcodes",
        &["couponCode", "discountType", "discountAmount", "endDate"],
    )
};

pub static POSTERS: Resource = Resource::new("Poster", "Posters", "posters", &["posterName"]);

/// 생성과 수정은 비밀번호 해싱이 필요하므로 `users` 모듈의 전용 핸들러가 담당합니다.
pub static USERS: Resource = Resource {
    capabilities: Capabilities {
        create: false,
        update: false,
        ..Capabilities::ALL
    },
    hidden: &["password"],
    ..Resource::new("User", "Users", "users", &["name", "password"])
};

pub static ORDERS: Resource = Resource {
    defaults: &[("orderStatus", "pending")],
    ..Resource::new(
        "Order",
        "Orders",
        "orders",
        &["userID", "items", "totalPrice", "shippingAddress", "paymentMethod"],
    )
};

/// 결제 기록. 외부 결제 대행사 연동은 다루지 않으며 기록은 수정/삭제할 수 없습니다.
pub static PAYMENTS: Resource = Resource {
    capabilities: Capabilities {
        update: false,
        delete: false,
        ..Capabilities::ALL
    },
    defaults: &[("status", "pending")],
    ..Resource::new(
        "Payment",
        "Payments",
        "payments",
        &["orderId", "amount", "paymentMethod"],
    )
};

pub static NOTIFICATIONS: Resource = Resource {
    capabilities: Capabilities {
        update: false,
        ..Capabilities::ALL
    },
    ..Resource::new(
        "Notification",
        "Notifications",
        "notifications",
        &["title", "description"],
    )
};
