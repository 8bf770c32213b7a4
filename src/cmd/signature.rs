use buswire::wire::{Result, Signature, WireType};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub signature: String,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct TypeJson {
	signature: String,
	alignment: usize,
	category: &'static str,
	basic: bool,
}

#[derive(serde::Serialize)]
struct SignatureJson {
	signature: String,
	types: Vec<TypeJson>,
}

/// Print alignment and category for every complete type in a signature.
pub fn run(args: Args) -> Result<()> {
	let Args { signature, json } = args;
	let signature = Signature::new(signature)?;
	let types: Vec<TypeJson> = signature.types().iter().map(describe).collect();

	if json {
		emit_json(&SignatureJson {
			signature: signature.to_string(),
			types,
		});
		return Ok(());
	}

	println!("signature: {signature}");
	for item in types {
		println!("  {}: align={} category={} basic={}", item.signature, item.alignment, item.category, item.basic);
	}
	Ok(())
}

fn describe(ty: &WireType) -> TypeJson {
	TypeJson {
		signature: ty.to_string(),
		alignment: ty.alignment(),
		category: ty.category().as_str(),
		basic: ty.is_basic(),
	}
}
