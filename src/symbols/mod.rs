//! The identifier table.
//!
//! Every name the lexer hands over is interned once and referred to by its
//! [`SymbolId`] from then on. Tokens never own identifier state: category,
//! type and fields live here, so whatever the declaration block decides is
//! what every later expression sees.
//!
//! Class types own a field template. Declaring a variable of a class type
//! instantiates the template, which is a deep copy: two `Point` variables
//! never share a field record, and neither shares one with `Point` itself.

use std::collections::HashMap;

/// Declaration identity of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

/// What a name was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
	Type,
	Var,
}

/// A declared name, or a field of a class template or of a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
	pub name:     String,
	/// Unset until the declaration block assigns it, set at most once.
	pub category: Option<Category>,
	/// The type of a variable or field. Type identifiers have none.
	pub r#type:   Option<SymbolId>,
	/// Position inside the owning field list, `0` for table entries.
	pub index:    usize,
	/// Class template for types, own instance for variables and fields.
	pub fields:   Vec<Identifier>,
}

impl Identifier {
	fn new(name: &str) -> Self { Self { name: name.to_string(), category: None, r#type: None, index: 0, fields: vec![] } }

	pub fn is_type(&self) -> bool { self.category == Some(Category::Type) }

	pub fn is_var(&self) -> bool { self.category == Some(Category::Var) }

	pub fn field(&self, name: &str) -> Option<&Identifier> { self.fields.iter().find(|field| field.name == name) }
}

/// Reasons the table refuses a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclareError {
	/// The name already has a category.
	Redeclared(String),
	/// The class already has a field with that name.
	FieldRedeclared(String),
	/// The given type is not a type identifier.
	NotAType(String),
}

/// Maps declaration identities to their records.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
	entries: Vec<Identifier>,
	names:   HashMap<String, SymbolId>,
}

impl SymbolTable {
	pub const BOOL: SymbolId = SymbolId(2);
	pub const FLOAT: SymbolId = SymbolId(1);
	pub const INT: SymbolId = SymbolId(0);

	/// A table holding only the primitive types.
	pub fn new() -> Self {
		let mut table = Self { entries: vec![], names: HashMap::new() };
		for name in ["int", "float", "bool"] {
			let id = table.intern(name);
			table.entries[id.0].category = Some(Category::Type);
		}
		table
	}

	/// Returns the id of `name`, adding an uncategorized entry on first sight.
	pub fn intern(&mut self, name: &str) -> SymbolId {
		if let Some(&id) = self.names.get(name) {
			return id;
		}
		let id = SymbolId(self.entries.len());
		self.entries.push(Identifier::new(name));
		self.names.insert(name.to_string(), id);
		id
	}

	pub fn lookup(&self, name: &str) -> Option<SymbolId> { self.names.get(name).copied() }

	pub fn get(&self, id: SymbolId) -> &Identifier { &self.entries[id.0] }

	pub fn get_mut(&mut self, id: SymbolId) -> &mut Identifier { &mut self.entries[id.0] }

	pub fn name(&self, id: SymbolId) -> &str { &self.entries[id.0].name }

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }

	pub fn is_numeric(id: SymbolId) -> bool { matches!(id, Self::INT | Self::FLOAT) }

	/// Marks `id` as a class type with an empty field template.
	pub fn declare_type(&mut self, id: SymbolId) -> Result<(), DeclareError> {
		let entry = &mut self.entries[id.0];
		if entry.category.is_some() {
			return Err(DeclareError::Redeclared(entry.name.clone()));
		}
		entry.category = Some(Category::Type);
		Ok(())
	}

	/// Marks `id` as a variable of type `r#type`. Class typed variables get
	/// their own copy of the class fields.
	pub fn declare_var(&mut self, id: SymbolId, r#type: SymbolId) -> Result<(), DeclareError> {
		if self.entries[id.0].category.is_some() {
			return Err(DeclareError::Redeclared(self.entries[id.0].name.clone()));
		}
		let fields = self.instantiate(r#type)?;
		let entry = &mut self.entries[id.0];
		entry.category = Some(Category::Var);
		entry.r#type = Some(r#type);
		entry.fields = fields;
		Ok(())
	}

	/// Appends a field named like `name` of type `r#type` to the template of
	/// `class`. Returns the field position.
	pub fn declare_field(&mut self, class: SymbolId, name: SymbolId, r#type: SymbolId) -> Result<usize, DeclareError> {
		let field_name = self.entries[name.0].name.clone();
		if self.entries[class.0].field(&field_name).is_some() {
			return Err(DeclareError::FieldRedeclared(field_name));
		}
		let fields = self.instantiate(r#type)?;
		let template = &mut self.entries[class.0].fields;
		let index = template.len();
		template.push(Identifier {
			name: field_name,
			category: Some(Category::Var),
			r#type: Some(r#type),
			index,
			fields,
		});
		Ok(index)
	}

	/// Fresh field records for a value of type `r#type`. Primitives have none.
	pub fn instantiate(&self, r#type: SymbolId) -> Result<Vec<Identifier>, DeclareError> {
		let template = &self.entries[r#type.0];
		if !template.is_type() {
			return Err(DeclareError::NotAType(template.name.clone()));
		}
		Ok(template.fields.clone())
	}
}

impl Default for SymbolTable {
	fn default() -> Self { Self::new() }
}
