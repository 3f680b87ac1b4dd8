use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        suppliers::{CreateSupplierRequest, SupplierList, UpdateSupplierRequest},
        users::{DeletedUser, UserList},
    },
    error::ErrorBody,
    models::{Category, Product, Supplier, User},
    response::{ApiResponse, Meta},
    routes::{auth, categories, health, params, products, suppliers, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::list_products,
        products::current_inventory,
        products::create_product,
        products::get_product,
        products::replace_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::replace_category,
        categories::update_category,
        categories::delete_category,
        suppliers::list_suppliers,
        suppliers::create_supplier,
        suppliers::get_supplier,
        suppliers::replace_supplier,
        suppliers::update_supplier,
        suppliers::delete_supplier,
        users::list_users,
        users::get_user,
        users::delete_user
    ),
    components(
        schemas(
            User,
            Product,
            Category,
            Supplier,
            ErrorBody,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateSupplierRequest,
            UpdateSupplierRequest,
            ProductList,
            CategoryList,
            SupplierList,
            UserList,
            DeletedUser,
            params::Pagination,
            params::SortOrder,
            params::ProductSortBy,
            params::ProductQuery,
            params::InventoryQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Category>,
            ApiResponse<CategoryList>,
            ApiResponse<Supplier>,
            ApiResponse<SupplierList>,
            ApiResponse<User>,
            ApiResponse<UserList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product and inventory endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Suppliers", description = "Supplier endpoints"),
        (name = "Users", description = "User administration endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
