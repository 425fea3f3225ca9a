/*
 * Responsibility
 * - access: Bearer トークン検証 → AuthCtx (認証)
 * - policy: RouteTable による許可/拒否 (認可)
 * - 401 は policy が「匿名で保護ルート」と判断した時、403 は権限不足 or 未登録ルート
 */
pub mod access;
pub mod policy;
