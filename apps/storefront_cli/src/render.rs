// storefront_cli/src/render.rs

//! Text and JSON output for the terminal front-end.

use anyhow::Result;
use serde_json::json;
use shopfront::{CartLineItem, CartTotals, CheckoutReceipt, Pagination, Product, RecommendationSection};

fn print_json(value: &serde_json::Value) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn product_row(p: &Product) -> String {
  let mut row = format!("{:<14} {:<40} ${:>9.2}", p.product_id, p.product_name, p.price);
  if let Some(savings) = p.savings() {
    row.push_str(&format!("  (save ${:.2})", savings));
  }
  if !p.in_stock() {
    row.push_str("  [out of stock]");
  } else if p.low_stock() {
    row.push_str("  [only a few left]");
  }
  row
}

pub fn products(items: &[Product], pagination: Option<&Pagination>, as_json: bool) -> Result<()> {
  if as_json {
    return print_json(&json!({ "products": items, "pagination": pagination }));
  }
  if items.is_empty() {
    println!("No products found.");
    return Ok(());
  }
  for p in items {
    println!("{}", product_row(p));
  }
  if let Some(page) = pagination {
    let more = if page.has_next() { " (more available)" } else { "" };
    println!(
      "Page {} of {} - {} products{}",
      page.page, page.total_pages, page.total, more
    );
  }
  Ok(())
}

pub fn product_detail(p: &Product, sections: &[RecommendationSection], as_json: bool) -> Result<()> {
  if as_json {
    return print_json(&json!({ "product": p, "recommendations": sections }));
  }
  println!("{} ({})", p.product_name, p.product_id);
  if let Some(brand) = &p.brand {
    println!("  by {}", brand);
  }
  println!("  ${:.2}  rating {:.1}/5", p.price, p.display_rating());
  if let Some(savings) = p.savings() {
    println!("  You save ${:.2}", savings);
  }
  match p.stock_quantity {
    Some(0) => println!("  Out of stock"),
    Some(n) if p.low_stock() => println!("  Only {} left in stock", n),
    _ => println!("  In stock"),
  }
  println!("  {}", p.primary_image());
  if let Some(description) = &p.description {
    println!();
    println!("{}", description);
  }
  for section in sections {
    print_section(section);
  }
  Ok(())
}

fn print_section(section: &RecommendationSection) {
  println!();
  println!("== {} ==", section.title);
  if let Some(subtitle) = &section.subtitle {
    println!("{}", subtitle);
  }
  for p in &section.products {
    println!("  {}", product_row(p));
  }
}

pub fn section(section: Option<&RecommendationSection>, as_json: bool) -> Result<()> {
  if as_json {
    return print_json(&json!({ "section": section }));
  }
  // Nothing to show renders nothing.
  if let Some(section) = section {
    print_section(section);
  }
  Ok(())
}

pub fn cart(lines: &[CartLineItem], totals: &CartTotals, as_json: bool) -> Result<()> {
  if as_json {
    return print_json(&json!({ "lines": lines, "totals": totals }));
  }
  if lines.is_empty() {
    println!("Your cart is empty.");
    return Ok(());
  }
  for line in lines {
    println!(
      "{}  {:<14} {:<32} {:>3} x ${:>8.2} = ${:>9.2}  ({})",
      line.id,
      line.product_id,
      line.product_name,
      line.quantity,
      line.price,
      line.line_total(),
      line.vendor_name
    );
  }
  print_totals(totals);
  Ok(())
}

fn print_totals(totals: &CartTotals) {
  println!("Subtotal: ${:.2}", totals.subtotal);
  println!("Tax:      ${:.2}", totals.tax);
  if totals.ships_free() {
    println!("Shipping: FREE");
  } else {
    println!("Shipping: ${:.2}", totals.shipping);
  }
  println!("Total:    ${:.2}", totals.total);
  if let Some(remaining) = totals.free_shipping_remaining() {
    println!("Add ${:.2} more for free shipping.", remaining);
  }
}

pub fn line(line: &CartLineItem, as_json: bool) -> Result<()> {
  if as_json {
    return print_json(&json!(line));
  }
  println!("{} x {} in cart ({})", line.quantity, line.product_name, line.id);
  Ok(())
}

pub fn receipt(receipt: &CheckoutReceipt, as_json: bool) -> Result<()> {
  if as_json {
    return print_json(&json!(receipt));
  }
  println!("Order placed: {}", receipt.order_id);
  for line in &receipt.lines {
    println!("  {} x {}", line.quantity, line.product_name);
  }
  print_totals(&receipt.totals);
  Ok(())
}

pub fn message(text: &str, as_json: bool) -> Result<()> {
  if as_json {
    return print_json(&json!({ "message": text }));
  }
  println!("{}", text);
  Ok(())
}
