//! Test fixtures for common test scenarios.
//!
//! The GNU project fixture models a small catalog (a GNU and an LLVM
//! tool-chain whose C compilers share an abstract base) and a project with
//! one configuration whose root folder uses a customized GNU tool-chain.

use crate::catalog::Catalog;
use crate::core::{
    Configuration, ConfigurationId, Model, ResourceId, Tool, ToolChain, ToolChainId, ToolId,
    ROOT_PATH,
};
use crate::ops::settings::instantiate_tool_chain;

/// A project model with handles to the interesting objects.
#[derive(Debug)]
pub struct ProjectFixture {
    pub model: Model,
    pub catalog: Catalog,
    pub configuration: ConfigurationId,
    /// Root folder info.
    pub root: ResourceId,
    /// Project tool-chain of the root folder.
    pub tool_chain: ToolChainId,

    /// Abstract `cdt.c.compiler`.
    pub c_base: ToolId,
    /// `gnu.c.compiler`, derived from `c_base`.
    pub gcc: ToolId,
    /// `llvm.clang.c`, derived from `c_base`.
    pub clang: ToolId,
    /// `tiny.c.compiler`, unrelated to the other compilers.
    pub tcc: ToolId,
    pub gxx: ToolId,
    pub linker: ToolId,
    pub archiver: ToolId,
    pub lld: ToolId,
    pub gnu_tc: ToolChainId,
    pub llvm_tc: ToolChainId,

    /// Root folder customizations of `gcc`, `gxx` and `linker`.
    pub root_gcc: ToolId,
    pub root_gxx: ToolId,
    pub root_linker: ToolId,
}

impl ProjectFixture {
    /// Tools currently applying to the root folder.
    pub fn root_tools(&self) -> Vec<ToolId> {
        self.model.resource_tools(self.root)
    }

    /// Add a sub-folder whose tool-chain customizes the root tool-chain.
    pub fn add_sub_folder(&mut self, path: &str) -> ResourceId {
        let tc = instantiate_tool_chain(&mut self.model, &self.catalog, self.tool_chain, None);
        self.model.add_folder(self.configuration, path, tc)
    }
}

/// Build the GNU project fixture.
pub fn gnu_project() -> ProjectFixture {
    let mut model = Model::new();
    let mut catalog = Catalog::new();
    catalog.define_property("buildType");

    let c_base = model.add_tool(
        Tool::extension("cdt.c.compiler", "C Compiler")
            .into_abstract()
            .with_inputs(["c"])
            .with_outputs(["o"])
            .with_setting("opt", "-O0")
            .with_setting("warnings", "-Wall")
            .with_supported_property("buildType", ["debug", "release"]),
    );
    let gcc = model.add_tool(
        Tool::extension("gnu.c.compiler", "GCC C Compiler")
            .with_superclass(c_base)
            .with_setting("gnu.c.std", "gnu11"),
    );
    let clang = model.add_tool(
        Tool::extension("llvm.clang.c", "Clang")
            .with_superclass(c_base)
            .with_setting("llvm.lto", "off"),
    );
    let tcc = model.add_tool(
        Tool::extension("tiny.c.compiler", "TCC")
            .with_inputs(["c"])
            .with_outputs(["o"])
            .with_setting("opt", "-O0"),
    );
    let gxx = model.add_tool(
        Tool::extension("gnu.cpp.compiler", "GCC C++ Compiler")
            .with_inputs(["cpp", "cxx", "cc"])
            .with_outputs(["o"])
            .with_setting("opt", "-O0"),
    );
    let linker = model.add_tool(
        Tool::extension("gnu.c.linker", "GCC Linker")
            .with_inputs(["o"])
            .with_outputs(["elf"])
            .with_output_variables(["EXECUTABLES"])
            .with_setting("libs", ""),
    );
    let archiver = model.add_tool(
        Tool::extension("gnu.archiver", "GCC Archiver")
            .with_inputs(["o"])
            .with_outputs(["a"])
            .with_output_variables(["LIBRARIES"]),
    );
    let lld = model.add_tool(
        Tool::extension("llvm.lld", "LLD")
            .with_inputs(["o"])
            .with_outputs(["elf"])
            .with_output_variables(["EXECUTABLES"]),
    );

    let gnu_tc = model.add_tool_chain(
        ToolChain::extension("gnu.toolchain", "GNU")
            .with_tools([gcc, gxx, linker])
            .with_target_tools(["gnu.c.linker"])
            .with_supported_property("buildType", ["debug", "release"]),
    );
    let llvm_tc = model.add_tool_chain(
        ToolChain::extension("llvm.toolchain", "LLVM")
            .with_tools([clang, lld])
            .with_target_tools(["llvm.lld"]),
    );

    let configuration = model.add_configuration(
        Configuration::new("debug", "Debug").with_property("buildType", "debug"),
    );
    let tool_chain = instantiate_tool_chain(&mut model, &catalog, gnu_tc, None);
    let root = model.add_folder(configuration, ROOT_PATH, tool_chain);

    let root_tools = model.tool_chain_tools(tool_chain).to_vec();
    let (root_gcc, root_gxx, root_linker) = (root_tools[0], root_tools[1], root_tools[2]);

    ProjectFixture {
        model,
        catalog,
        configuration,
        root,
        tool_chain,
        c_base,
        gcc,
        clang,
        tcc,
        gxx,
        linker,
        archiver,
        lld,
        gnu_tc,
        llvm_tc,
        root_gcc,
        root_gxx,
        root_linker,
    }
}

/// A small manifest exercising every section, for loader and CLI tests.
pub fn gnu_manifest() -> &'static str {
    r#"[project]
nature = "c"
properties = ["buildType"]

[project.file_associations]
"source.c" = ["i"]

[[tool]]
id = "cdt.c.compiler"
name = "C Compiler"
abstract = true
inputs = ["c"]
content_types = ["source.c"]
outputs = ["o"]
settings = { opt = "-O0", warnings = "-Wall" }

[[tool]]
id = "gnu.c.compiler"
name = "GCC C Compiler"
superclass = "cdt.c.compiler"
settings = { "gnu.c.std" = "gnu11" }

[[tool]]
id = "llvm.clang.c"
name = "Clang"
superclass = "cdt.c.compiler"

[[tool]]
id = "tiny.c.compiler"
name = "TCC"
inputs = ["c"]
outputs = ["o"]

[[tool]]
id = "gnu.c.linker"
name = "GCC Linker"
inputs = ["o"]
outputs = ["elf"]
output_variables = ["EXECUTABLES"]

[[tool]]
id = "llvm.lld"
name = "LLD"
inputs = ["o"]
outputs = ["elf"]
output_variables = ["EXECUTABLES"]

[[tool]]
id = "legacy.c.compiler"
name = "Legacy"
inputs = ["c"]
managed_build = false

[[tool_chain]]
id = "gnu.toolchain"
name = "GNU"
tools = ["gnu.c.compiler", "gnu.c.linker"]
target_tools = ["gnu.c.linker"]

[[tool_chain]]
id = "llvm.toolchain"
name = "LLVM"
tools = ["llvm.clang.c", "llvm.lld"]
target_tools = ["llvm.lld"]

[[converter]]
id = "gcc-to-clang"
kind = "copy-settings"
from = "gnu.c.compiler"
to = "llvm.clang.c"

[[configuration]]
id = "debug"
name = "Debug"
tool_chain = "gnu.toolchain"
properties = { buildType = "debug" }

[configuration.settings]
"gnu.c.compiler" = { opt = "-O3" }

[[configuration.folder]]
path = "src/legacy"

[[configuration.file]]
path = "src/main.c"
tools = ["gnu.c.compiler"]
"#
}
