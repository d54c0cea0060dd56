//! In-memory mutations of a platform's category map.
//!
//! Each function either applies its change completely or returns an error and
//! leaves the map untouched. The service layer runs them inside a
//! compare-and-swap loop against the stored platform version.

use super::catalog_model::{
    normalize_service_id, CategoryMap, NewService, Service, ServicePatch, ServiceRef,
};
use crate::{Error, Result};

fn category_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::missing_field("category"));
    }
    Ok(name.to_string())
}

fn category_mut<'a>(categories: &'a mut CategoryMap, name: &str) -> Result<&'a mut Vec<Service>> {
    let name = category_name(name)?;
    categories
        .get_mut(&name)
        .ok_or_else(|| Error::not_found("Category", &name))
}

fn locate(services: &[Service], category: &str, service_ref: &ServiceRef) -> Result<usize> {
    match service_ref {
        ServiceRef::Index(index) if *index < services.len() => Ok(*index),
        ServiceRef::Index(index) => Err(Error::NotFound(format!(
            "Service index {} is out of bounds for category '{}' ({} services)",
            index,
            category,
            services.len()
        ))),
        ServiceRef::Key(key) => services
            .iter()
            .position(|s| &s.key == key)
            .ok_or_else(|| Error::not_found("Service", key)),
    }
}

fn ensure_unique_id(services: &[Service], service_id: &str, skip: Option<usize>) -> Result<()> {
    let wanted = normalize_service_id(service_id);
    let clash = services
        .iter()
        .enumerate()
        .any(|(i, s)| Some(i) != skip && normalize_service_id(&s.service_id) == wanted);
    if clash {
        return Err(Error::Conflict(format!(
            "Service id '{}' already exists in this category",
            wanted
        )));
    }
    Ok(())
}

/// Rewrites `order` so it matches each service's list position.
pub fn renumber(services: &mut [Service]) {
    for (position, service) in services.iter_mut().enumerate() {
        service.order = position as u32;
    }
}

pub fn add_category(categories: &mut CategoryMap, name: &str) -> Result<()> {
    let name = category_name(name)?;
    if categories.contains_key(&name) {
        return Err(Error::Conflict(format!("Category '{}' already exists", name)));
    }
    categories.insert(name, Vec::new());
    Ok(())
}

/// Moves `old` to `new`, keeping its position. An existing `new` category is
/// overwritten in place, not merged.
pub fn rename_category(categories: &mut CategoryMap, old: &str, new: &str) -> Result<()> {
    let old = category_name(old)?;
    let new = category_name(new)?;
    let (position, _, services) = categories
        .shift_remove_full(&old)
        .ok_or_else(|| Error::not_found("Category", &old))?;
    let (inserted_at, previous) = categories.insert_full(new, services);
    if previous.is_none() {
        categories.move_index(inserted_at, position);
    }
    Ok(())
}

pub fn delete_category(categories: &mut CategoryMap, name: &str) -> Result<Vec<Service>> {
    let name = category_name(name)?;
    categories
        .shift_remove(&name)
        .ok_or_else(|| Error::not_found("Category", &name))
}

/// Appends a service under `key`; the id must be new to the category.
pub fn add_service(
    categories: &mut CategoryMap,
    category: &str,
    key: &str,
    new_service: NewService,
) -> Result<Service> {
    new_service.validate()?;
    let services = category_mut(categories, category)?;
    ensure_unique_id(services, &new_service.service_id, None)?;

    let service = new_service.into_service(key.to_string(), services.len() as u32);
    services.push(service.clone());
    Ok(service)
}

pub fn update_service(
    categories: &mut CategoryMap,
    category: &str,
    service_ref: &ServiceRef,
    patch: &ServicePatch,
) -> Result<Service> {
    let services = category_mut(categories, category)?;
    let index = locate(services, category, service_ref)?;
    let merged = patch.apply_to(&services[index])?;
    ensure_unique_id(services, &merged.service_id, Some(index))?;

    services[index] = merged.clone();
    Ok(merged)
}

/// Removes exactly one service; later services shift down one position.
pub fn delete_service(
    categories: &mut CategoryMap,
    category: &str,
    service_ref: &ServiceRef,
) -> Result<Service> {
    let services = category_mut(categories, category)?;
    let index = locate(services, category, service_ref)?;
    let removed = services.remove(index);
    renumber(services);
    Ok(removed)
}
