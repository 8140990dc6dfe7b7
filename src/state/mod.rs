pub mod regenerate_flow;
pub mod voucher_form;
